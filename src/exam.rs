//! Built-in exam bank: the scenarios, case data, and weights the `grade`
//! binary runs against a submission.
use crate::assertions::{assert_allclose, assert_approx, assert_equal, assert_set_equal};
use crate::grading::{
    module_item, param, Arg, Case, Failure, Group, Routine, Scenario, Suite,
};
use anyhow::Result;
use serde_json::{json, Value};
use std::f64::consts::PI;

const GROUP_WEIGHT: u32 = 10;

const FUNNY_WORDS: &[&str] = &[
    "poboy", "dobby", "cuppy", "hobby", "pudgy", "cocky", "bawdy", "miffy", "foamy", "jazzy",
    "caddy", "jaggy", "muddy", "jumpy", "duchy", "poppy", "yucky", "bumpy", "biddy", "choky",
    "fuzzy", "buggy", "byway", "gaudy", "dizzy", "moody", "muggy", "gabby", "dicky", "doggy",
    "wiggy", "hooky", "kiddy", "dumpy", "waddy", "guppy", "woody", "doozy", "giddy", "mummy",
    "gamay", "piggy", "divvy", "gawky", "bobby", "woozy", "ducky", "buddy", "cooky", "mommy",
    "dodgy", "middy", "gummy", "kooky", "jiffy", "humpy", "picky", "comfy", "puppy", "muzzy",
    "copay", "cabby", "gauzy", "booby", "boomy", "mammy", "boody", "pommy", "zappy", "yummy",
    "wacky", "jimmy", "hubby", "bubby", "paddy", "pappy", "goofy", "cubby", "goody", "juicy",
    "hammy", "daffy", "kicky", "zippy", "pawky", "biffy", "hippy", "baggy", "howdy", "cuddy",
    "daddy", "dowdy", "dippy", "happy", "huffy", "dummy", "foggy",
];

const ANIMALS: &[&str] = &["hippo", "zebra", "panda", "koala"];

/// Relative tolerance for rotated coordinates.
const ALLCLOSE_RTOL: f64 = 1e-7;

fn arity_mismatch(args: &[Arg]) -> Failure {
    Failure::internal(format!("unexpected argument count {}", args.len()))
}

fn test_count_even(args: &[Arg]) -> Result<(), Failure> {
    let [func, values, expected] = args else {
        return Err(arity_mismatch(args));
    };
    let result = func.call(&[values.value()?.clone()])?;
    assert_equal(&result, expected.value()?)
}

fn test_cone_surface_area(args: &[Arg]) -> Result<(), Failure> {
    let [func, radius, height, expected] = args else {
        return Err(arity_mismatch(args));
    };
    let result = func.call(&[radius.value()?.clone(), height.value()?.clone()])?;
    assert_approx(&result, expected.value()?)
}

fn test_filter_matching(args: &[Arg]) -> Result<(), Failure> {
    let [func, wordbank, target, position, expected] = args else {
        return Err(arity_mismatch(args));
    };
    let result = func.call(&[
        wordbank.value()?.clone(),
        target.value()?.clone(),
        position.value()?.clone(),
    ])?;
    assert_equal(&result, expected.value()?)
}

fn test_filter_absence(args: &[Arg]) -> Result<(), Failure> {
    let [func, wordbank, unwanted, expected] = args else {
        return Err(arity_mismatch(args));
    };
    let result = func.call(&[wordbank.value()?.clone(), unwanted.value()?.clone()])?;
    assert_equal(&result, expected.value()?)
}

fn test_filter_misplaced(args: &[Arg]) -> Result<(), Failure> {
    let [func, wordbank, target, unwanted_positions, expected] = args else {
        return Err(arity_mismatch(args));
    };
    let result = func.call(&[
        wordbank.value()?.clone(),
        target.value()?.clone(),
        unwanted_positions.value()?.clone(),
    ])?;
    assert_equal(&result, expected.value()?)
}

fn test_all_prefixes(args: &[Arg]) -> Result<(), Failure> {
    let [func, s, expected] = args else {
        return Err(arity_mismatch(args));
    };
    let result = func.call(&[s.value()?.clone()])?;
    assert_equal(&result, expected.value()?)
}

fn test_longest_common_prefix(args: &[Arg]) -> Result<(), Failure> {
    let [func, s1, s2, expected] = args else {
        return Err(arity_mismatch(args));
    };
    let result = func.call(&[s1.value()?.clone(), s2.value()?.clone()])?;
    assert_equal(&result, expected.value()?)
}

fn test_appear_once(args: &[Arg]) -> Result<(), Failure> {
    let [func, values, expected] = args else {
        return Err(arity_mismatch(args));
    };
    let result = func.call(&[values.value()?.clone()])?;
    assert_set_equal(&result, expected.value()?)
}

fn test_create_enumerate_array(args: &[Arg]) -> Result<(), Failure> {
    let [func, nrows, ncols, expected] = args else {
        return Err(arity_mismatch(args));
    };
    let result = func.call(&[nrows.value()?.clone(), ncols.value()?.clone()])?;
    assert_equal(&result, expected.value()?)
}

fn test_rotate_point(args: &[Arg]) -> Result<(), Failure> {
    let [func, point, angle, expected] = args else {
        return Err(arity_mismatch(args));
    };
    let result = func.call(&[point.value()?.clone(), angle.value()?.clone()])?;
    assert_allclose(&result, expected.value()?, ALLCLOSE_RTOL, 1e-9)
}

fn test_remove_neg_sum_cols(args: &[Arg]) -> Result<(), Failure> {
    let [func, array, expected] = args else {
        return Err(arity_mismatch(args));
    };
    let result = func.call(&[array.value()?.clone()])?;
    assert_equal(&result, expected.value()?)
}

fn test_subtract_by_row_min(args: &[Arg]) -> Result<(), Failure> {
    let [func, array, expected] = args else {
        return Err(arity_mismatch(args));
    };
    let result = func.call(&[array.value()?.clone()])?;
    assert_equal(&result, expected.value()?)
}

/// Scenario whose first parameter is artifact function `item` and whose
/// remaining parameters are case data.
fn scenario(
    name: &str,
    item: &str,
    parameters: &[&str],
    body: fn(&[Arg]) -> Result<(), Failure>,
) -> Result<Scenario> {
    let mut sources = vec![module_item(item)];
    sources.extend((1..parameters.len()).map(|_| param()));
    Scenario::create(Routine::new(name, parameters, body), sources).map_err(anyhow::Error::from)
}

fn cases<const N: usize>(scenario: &Scenario, rows: Vec<[Value; N]>) -> Result<Vec<Case>> {
    rows.into_iter()
        .map(|row| scenario.data(row).map_err(anyhow::Error::from))
        .collect()
}

fn words_except(excluded: &[&str]) -> Value {
    json!(FUNNY_WORDS
        .iter()
        .filter(|word| !excluded.contains(*word))
        .collect::<Vec<_>>())
}

/// Build the full exam suite.
pub fn exam_suite() -> Result<Suite> {
    Ok(Suite::new(vec![
        count_even_group()?,
        cone_surface_area_group()?,
        wordle_matching_group()?,
        wordle_absence_group()?,
        wordle_misplaced_group()?,
        all_prefixes_group()?,
        longest_common_prefix_group()?,
        appear_once_group()?,
        enumerate_array_group()?,
        rotate_point_group()?,
        remove_neg_sum_cols_group()?,
        subtract_by_row_min_group()?,
    ]))
}

fn count_even_group() -> Result<Group> {
    let test = scenario(
        "test_count_even",
        "count_even",
        &["func", "values", "expected"],
        test_count_even,
    )?;
    let cases = cases(
        &test,
        vec![
            [json!([1, 2, 3, 4, 5]), json!(2)],
            [json!([1, 3, 5, 7]), json!(0)],
            [json!([2, 4, 8, 16, 32]), json!(5)],
            [json!([]), json!(0)],
        ],
    )?;
    Ok(Group::new("0. Count Even", GROUP_WEIGHT, cases))
}

fn cone_surface_area_group() -> Result<Group> {
    let test = scenario(
        "test_cone_surface_area",
        "cone_surface_area",
        &["func", "radius", "height", "expected"],
        test_cone_surface_area,
    )?;
    let cases = cases(
        &test,
        vec![
            [json!(2), json!(3), json!(35.22071741263713)],
            [json!(2), json!(0), json!(8.0 * PI)],
            [json!(0), json!(3), json!(0)],
            [json!(3), json!(4), json!(24.0 * PI)],
        ],
    )?;
    Ok(Group::new("1. Cone Surface Area", GROUP_WEIGHT, cases))
}

fn wordle_matching_group() -> Result<Group> {
    let test = scenario(
        "test_filter_matching",
        "filter_matching",
        &["func", "wordbank", "target", "position", "expected"],
        test_filter_matching,
    )?;
    let cases = cases(
        &test,
        vec![
            [json!(ANIMALS), json!("a"), json!(5), json!(["zebra", "panda", "koala"])],
            [json!(ANIMALS), json!("e"), json!(2), json!(["zebra"])],
            [json!(ANIMALS), json!("x"), json!(1), json!([])],
            [
                json!(FUNNY_WORDS),
                json!("m"),
                json!(1),
                json!([
                    "miffy", "muddy", "moody", "muggy", "mummy", "mommy", "middy", "muzzy",
                    "mammy",
                ]),
            ],
            [json!(FUNNY_WORDS), json!("m"), json!(2), json!([])],
            [json!(FUNNY_WORDS), json!("i"), json!(3), json!(["juicy"])],
            [json!(FUNNY_WORDS), json!("e"), json!(4), json!([])],
            [json!(FUNNY_WORDS), json!("y"), json!(5), json!(FUNNY_WORDS)],
            [
                json!(FUNNY_WORDS),
                json!("k"),
                json!(4),
                json!([
                    "cocky", "yucky", "choky", "dicky", "hooky", "gawky", "ducky", "cooky",
                    "kooky", "picky", "wacky", "kicky", "pawky",
                ]),
            ],
            [json!([]), json!("x"), json!(2), json!([])],
        ],
    )?;
    Ok(Group::new("2.1 Wordle Matching", GROUP_WEIGHT, cases))
}

fn wordle_absence_group() -> Result<Group> {
    let test = scenario(
        "test_filter_absence",
        "filter_absence",
        &["func", "wordbank", "unwanted", "expected"],
        test_filter_absence,
    )?;
    let cases = cases(
        &test,
        vec![
            [json!(ANIMALS), json!("a"), json!(["hippo"])],
            [json!(["zebra", "panda", "koala"]), json!("a"), json!([])],
            [json!(ANIMALS), json!("x"), json!(ANIMALS)],
            [
                json!(FUNNY_WORDS),
                json!("m"),
                words_except(&[
                    "miffy", "foamy", "muddy", "jumpy", "bumpy", "moody", "muggy", "dumpy",
                    "mummy", "gamay", "mommy", "middy", "gummy", "humpy", "comfy", "muzzy",
                    "boomy", "mammy", "pommy", "yummy", "jimmy", "hammy", "dummy",
                ]),
            ],
            [
                json!(FUNNY_WORDS),
                json!("u"),
                words_except(&[
                    "cuppy", "pudgy", "muddy", "jumpy", "duchy", "yucky", "bumpy", "fuzzy",
                    "buggy", "gaudy", "muggy", "dumpy", "guppy", "mummy", "ducky", "buddy",
                    "gummy", "humpy", "puppy", "muzzy", "gauzy", "yummy", "hubby", "bubby",
                    "cubby", "juicy", "cuddy", "huffy", "dummy",
                ]),
            ],
            [json!(FUNNY_WORDS), json!("y"), json!([])],
            [json!(FUNNY_WORDS), json!("r"), json!(FUNNY_WORDS)],
            [json!([]), json!("j"), json!([])],
        ],
    )?;
    Ok(Group::new("2.2 Wordle Absence", GROUP_WEIGHT, cases))
}

fn wordle_misplaced_group() -> Result<Group> {
    let test = scenario(
        "test_filter_misplaced",
        "filter_misplaced",
        &["func", "wordbank", "target", "unwanted_positions", "expected"],
        test_filter_misplaced,
    )?;
    let cases = cases(
        &test,
        vec![
            [json!(ANIMALS), json!("a"), json!([2, 3]), json!(["zebra"])],
            [json!(ANIMALS), json!("o"), json!([1, 4]), json!(["hippo", "koala"])],
            [json!(ANIMALS), json!("x"), json!([1, 2, 5]), json!([])],
            [
                json!(FUNNY_WORDS),
                json!("m"),
                json!([1, 4]),
                json!(["jumpy", "bumpy", "dumpy", "gamay", "humpy", "comfy"]),
            ],
            [json!(FUNNY_WORDS), json!("u"), json!([2, 3]), json!([])],
            [
                json!(FUNNY_WORDS),
                json!("f"),
                json!([]),
                json!([
                    "miffy", "foamy", "fuzzy", "jiffy", "comfy", "goofy", "daffy", "biffy",
                    "huffy", "foggy",
                ]),
            ],
            [json!(FUNNY_WORDS), json!("y"), json!([3]), json!(FUNNY_WORDS)],
            [json!(FUNNY_WORDS), json!("o"), json!([1, 2, 3, 4, 5]), json!([])],
            [json!([]), json!("x"), json!([3, 5]), json!([])],
        ],
    )?;
    Ok(Group::new("2.3 Wordle Misplaced", GROUP_WEIGHT, cases))
}

fn all_prefixes_group() -> Result<Group> {
    let test = scenario(
        "test_all_prefixes",
        "all_prefixes",
        &["func", "s", "expected"],
        test_all_prefixes,
    )?;
    let cases = cases(
        &test,
        vec![
            [
                json!("APPLES"),
                json!(["", "A", "AP", "APP", "APPL", "APPLE", "APPLES"]),
            ],
            [
                json!("Hello, World!"),
                json!([
                    "",
                    "H",
                    "He",
                    "Hel",
                    "Hell",
                    "Hello",
                    "Hello,",
                    "Hello, ",
                    "Hello, W",
                    "Hello, Wo",
                    "Hello, Wor",
                    "Hello, Worl",
                    "Hello, World",
                    "Hello, World!",
                ]),
            ],
            [
                json!("\u{1F468}\u{200D}\u{1F9B1}"),
                json!([
                    "",
                    "\u{1F468}",
                    "\u{1F468}\u{200D}",
                    "\u{1F468}\u{200D}\u{1F9B1}",
                ]),
            ],
            [json!(""), json!([""])],
        ],
    )?;
    Ok(Group::new("3.1 All Prefixes", GROUP_WEIGHT, cases))
}

fn longest_common_prefix_group() -> Result<Group> {
    let test = scenario(
        "test_longest_common_prefix",
        "longest_common_prefix",
        &["func", "s1", "s2", "expected"],
        test_longest_common_prefix,
    )?;
    let cases = cases(
        &test,
        vec![
            [json!("dolphin"), json!("dog"), json!("do")],
            [json!("dog"), json!("cat"), json!("")],
            [json!("anteater"), json!("ant"), json!("ant")],
            [json!("ant"), json!("anteater"), json!("ant")],
            [json!(""), json!(""), json!("")],
        ],
    )?;
    Ok(Group::new("3.2 Longest Common Prefix", GROUP_WEIGHT, cases))
}

fn appear_once_group() -> Result<Group> {
    let test = scenario(
        "test_appear_once",
        "appear_once",
        &["func", "values", "expected"],
        test_appear_once,
    )?;
    let cases = cases(
        &test,
        vec![
            [json!([1, 2, 3, 4, 5, 3, 6, 4, 8]), json!([1, 2, 5, 6, 8])],
            [json!([1, 3, 5, 7, 9]), json!([1, 3, 5, 7, 9])],
            [json!([1, 1, 2, 2, 3, 3, 3]), json!([])],
            [json!([]), json!([])],
        ],
    )?;
    Ok(Group::new("4. Appear Once", GROUP_WEIGHT, cases))
}

fn enumerate_array_group() -> Result<Group> {
    let test = scenario(
        "test_create_enumerate_array",
        "create_enumerate_array",
        &["func", "nrows", "ncols", "expected"],
        test_create_enumerate_array,
    )?;
    let cases = cases(
        &test,
        vec![
            [json!(2), json!(3), json!([[1, 3, 5], [2, 4, 6]])],
            [json!(3), json!(2), json!([[1, 4], [2, 5], [3, 6]])],
            [json!(1), json!(1), json!([[1]])],
        ],
    )?;
    Ok(Group::new("5. Column Major Enum Array", GROUP_WEIGHT, cases))
}

fn rotate_point_group() -> Result<Group> {
    let test = scenario(
        "test_rotate_point",
        "rotate_point",
        &["func", "point", "angle", "expected"],
        test_rotate_point,
    )?;
    let cases = cases(
        &test,
        vec![
            [json!([1, 2]), json!(90), json!([-2, 1])],
            [
                json!([-4, 1]),
                json!(-45),
                json!([-2.121320343559643, 3.5355339059327373]),
            ],
            [
                json!([7.25, -4.75]),
                json!(108),
                json!([2.2771452431836114, 8.362990466420865]),
            ],
            [json!([-12, -16]), json!(-143.13010235415598), json!([0, 20])],
            [json!([3, -6]), json!(0), json!([3, -6])],
            [json!([-8, 4]), json!(360), json!([-8, 4])],
            [json!([0, 0]), json!(17.29), json!([0, 0])],
        ],
    )?;
    Ok(Group::new("6. Rotate Point", GROUP_WEIGHT, cases))
}

fn remove_neg_sum_cols_group() -> Result<Group> {
    let test = scenario(
        "test_remove_neg_sum_cols",
        "remove_neg_sum_cols",
        &["func", "array", "expected"],
        test_remove_neg_sum_cols,
    )?;
    let cases = cases(
        &test,
        vec![
            [
                json!([
                    [3, 2, -6, -3, -6],
                    [-3, -5, 1, 3, -5],
                    [3, 2, 2, -1, 2],
                    [-3, 1, -5, -1, -3],
                ]),
                json!([[3, 2], [-3, -5], [3, 2], [-3, 1]]),
            ],
            [
                json!([[-5, -12, -9, -6], [-15, 2, 2, -9], [-11, -7, -15, 4]]),
                json!([[], [], []]),
            ],
            [
                json!([[0, 3, 3, 1], [4, 0, 3, -2], [-1, 2, 4, 3]]),
                json!([[0, 3, 3, 1], [4, 0, 3, -2], [-1, 2, 4, 3]]),
            ],
            [
                json!([[7, 2, -6], [3, -8, -4], [-4, -9, -4], [-6, 13, 15]]),
                json!([[7, -6], [3, -4], [-4, -4], [-6, 15]]),
            ],
        ],
    )?;
    Ok(Group::new(
        "7. Remove Negative-Sum Columns",
        GROUP_WEIGHT,
        cases,
    ))
}

fn subtract_by_row_min_group() -> Result<Group> {
    let test = scenario(
        "test_subtract_by_row_min",
        "subtract_by_row_min",
        &["func", "array", "expected"],
        test_subtract_by_row_min,
    )?;
    let cases = cases(
        &test,
        vec![
            [
                json!([
                    [48, 54, 79, -22, -23],
                    [-72, -39, 45, -21, -53],
                    [100, 62, -74, 0, 95],
                    [99, -2, 58, 12, 60],
                ]),
                json!([
                    [71, 77, 102, 1, 0],
                    [0, 33, 117, 51, 19],
                    [174, 136, 0, 74, 169],
                    [101, 0, 60, 14, 62],
                ]),
            ],
            [
                json!([[16, 70, 24, -9], [90, 76, 49, 91], [65, 72, 80, 55]]),
                json!([[25, 79, 33, 0], [41, 27, 0, 42], [10, 17, 25, 0]]),
            ],
            [
                json!([[241, 319, 241], [254, 266, 118]]),
                json!([[0, 78, 0], [136, 148, 0]]),
            ],
        ],
    )?;
    Ok(Group::new("8. Subtract By Row Minimum", GROUP_WEIGHT, cases))
}
