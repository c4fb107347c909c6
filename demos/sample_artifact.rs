//! Reference submission for the built-in exam bank.
//!
//! Speaks the grader's line-delimited JSON protocol on stdin/stdout. The
//! `--sabotage` and `--omit` switches make it answer `null` for, or leave
//! undefined, selected functions. `--garbage`, `--crash-after` and
//! `--fail-describe` break the protocol itself.
use anyhow::{Context, Result};
use clap::Parser;
use exam_grader::artifact::{Manifest, RemoteError, Request, Response};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};

const FUNCTIONS: &[&str] = &[
    "count_even",
    "cone_surface_area",
    "filter_matching",
    "filter_absence",
    "filter_misplaced",
    "all_prefixes",
    "longest_common_prefix",
    "appear_once",
    "create_enumerate_array",
    "rotate_point",
    "remove_neg_sum_cols",
    "subtract_by_row_min",
];

#[derive(Parser, Debug)]
#[command(name = "sample-artifact", about = "Reference exam submission")]
struct Args {
    /// Answer `null` for this function (repeatable)
    #[arg(long, value_name = "NAME")]
    sabotage: Vec<String>,

    /// Leave this function undefined (repeatable)
    #[arg(long, value_name = "NAME")]
    omit: Vec<String>,

    /// Answer calls to this function with a line that is not JSON (repeatable)
    #[arg(long, value_name = "NAME")]
    garbage: Vec<String>,

    /// Exit without answering once this many calls have been served
    #[arg(long, value_name = "N")]
    crash_after: Option<usize>,

    /// Refuse the describe request, as a submission that fails to load would
    #[arg(long)]
    fail_describe: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    let mut calls_served = 0;
    for line in stdin.lock().lines() {
        let line = line.context("read request")?;
        if line.trim().is_empty() {
            continue;
        }
        let response = match serde_json::from_str::<Request>(&line) {
            Ok(Request::Call { name, .. }) if args.garbage.contains(&name) => {
                calls_served += 1;
                send(&mut stdout, "this is not json")?;
                continue;
            }
            Ok(request @ Request::Call { .. }) => {
                if args.crash_after == Some(calls_served) {
                    return Ok(());
                }
                calls_served += 1;
                handle(&args, request)
            }
            Ok(request) => handle(&args, request),
            Err(err) => error("ProtocolError", format!("malformed request: {err}")),
        };
        let encoded = serde_json::to_string(&response).context("encode response")?;
        send(&mut stdout, &encoded)?;
    }
    Ok(())
}

fn send(out: &mut impl Write, line: &str) -> Result<()> {
    out.write_all(line.as_bytes())
        .and_then(|()| out.write_all(b"\n"))
        .and_then(|()| out.flush())
        .context("write response")
}

fn handle(args: &Args, request: Request) -> Response {
    match request {
        Request::Describe if args.fail_describe => error(
            "ImportError",
            "submission could not be loaded".to_string(),
        ),
        Request::Describe => {
            let manifest = Manifest {
                functions: FUNCTIONS
                    .iter()
                    .filter(|name| !args.omit.iter().any(|omitted| omitted.as_str() == **name))
                    .map(|name| (*name).to_string())
                    .collect(),
                values: BTreeMap::new(),
            };
            match serde_json::to_value(manifest) {
                Ok(value) => Response::Ok(value),
                Err(err) => error("ProtocolError", err.to_string()),
            }
        }
        Request::Call { name, args: call_args } => {
            if args.omit.contains(&name) {
                return error("NameError", format!("name {name:?} is not defined"));
            }
            if args.sabotage.contains(&name) {
                return Response::Ok(Value::Null);
            }
            match call(&name, &call_args) {
                Ok(value) => Response::Ok(value),
                Err(err) => Response::Error(err),
            }
        }
    }
}

fn error(kind: &str, message: String) -> Response {
    Response::Error(RemoteError {
        kind: kind.to_string(),
        message,
        location: None,
    })
}

fn type_error(message: impl Into<String>) -> RemoteError {
    RemoteError {
        kind: "TypeError".to_string(),
        message: message.into(),
        location: None,
    }
}

fn call(name: &str, args: &[Value]) -> Result<Value, RemoteError> {
    match (name, args) {
        ("count_even", [values]) => {
            let count = int_list(values)?.iter().filter(|n| *n % 2 == 0).count();
            Ok(json!(count))
        }
        ("cone_surface_area", [radius, height]) => {
            let (r, h) = (number(radius)?, number(height)?);
            Ok(json!(std::f64::consts::PI * r * (r + r.hypot(h))))
        }
        ("filter_matching", [wordbank, target, position]) => {
            let target = single_char(target)?;
            let position = index(position)?;
            Ok(json!(words(wordbank)?
                .into_iter()
                .filter(|word| word.chars().nth(position) == Some(target))
                .collect::<Vec<_>>()))
        }
        ("filter_absence", [wordbank, unwanted]) => {
            let unwanted = single_char(unwanted)?;
            Ok(json!(words(wordbank)?
                .into_iter()
                .filter(|word| !word.contains(unwanted))
                .collect::<Vec<_>>()))
        }
        ("filter_misplaced", [wordbank, target, unwanted_positions]) => {
            let target = single_char(target)?;
            let positions = unwanted_positions
                .as_array()
                .ok_or_else(|| type_error("unwanted_positions must be a list"))?
                .iter()
                .map(index)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(json!(words(wordbank)?
                .into_iter()
                .filter(|word| {
                    word.contains(target)
                        && positions
                            .iter()
                            .all(|position| word.chars().nth(*position) != Some(target))
                })
                .collect::<Vec<_>>()))
        }
        ("all_prefixes", [s]) => {
            let s = text(s)?;
            let mut prefixes = vec![String::new()];
            let mut prefix = String::new();
            for ch in s.chars() {
                prefix.push(ch);
                prefixes.push(prefix.clone());
            }
            Ok(json!(prefixes))
        }
        ("longest_common_prefix", [s1, s2]) => {
            let prefix: String = text(s1)?
                .chars()
                .zip(text(s2)?.chars())
                .take_while(|(a, b)| a == b)
                .map(|(a, _)| a)
                .collect();
            Ok(json!(prefix))
        }
        ("appear_once", [values]) => {
            let values = values
                .as_array()
                .ok_or_else(|| type_error("values must be a list"))?;
            let once: Vec<&Value> = values
                .iter()
                .filter(|value| values.iter().filter(|other| other == value).count() == 1)
                .collect();
            Ok(json!(once))
        }
        ("create_enumerate_array", [nrows, ncols]) => {
            let (nrows, ncols) = (int(nrows)?, int(ncols)?);
            let rows: Vec<Vec<i64>> = (0..nrows)
                .map(|row| (0..ncols).map(|col| col * nrows + row + 1).collect())
                .collect();
            Ok(json!(rows))
        }
        ("rotate_point", [point, angle]) => {
            let point = point
                .as_array()
                .ok_or_else(|| type_error("point must be a pair"))?;
            let [x, y] = point.as_slice() else {
                return Err(type_error("point must be a pair"));
            };
            let (x, y) = (number(x)?, number(y)?);
            let (sin, cos) = number(angle)?.to_radians().sin_cos();
            Ok(json!([x * cos - y * sin, x * sin + y * cos]))
        }
        ("remove_neg_sum_cols", [array]) => {
            let rows = matrix(array)?;
            let ncols = rows.first().map_or(0, Vec::len);
            let keep: Vec<usize> = (0..ncols)
                .filter(|col| rows.iter().map(|row| row[*col]).sum::<f64>() >= 0.0)
                .collect();
            let kept: Vec<Vec<f64>> = rows
                .iter()
                .map(|row| keep.iter().map(|col| row[*col]).collect())
                .collect();
            Ok(json!(kept))
        }
        ("subtract_by_row_min", [array]) => {
            let rows = matrix(array)?;
            let shifted: Vec<Vec<f64>> = rows
                .iter()
                .map(|row| {
                    let min = row.iter().copied().fold(f64::INFINITY, f64::min);
                    row.iter().map(|value| value - min).collect()
                })
                .collect();
            Ok(json!(shifted))
        }
        _ if FUNCTIONS.contains(&name) => Err(type_error(format!(
            "{name}() got {} arguments",
            args.len()
        ))),
        _ => Err(RemoteError {
            kind: "NameError".to_string(),
            message: format!("name {name:?} is not defined"),
            location: None,
        }),
    }
}

fn number(value: &Value) -> Result<f64, RemoteError> {
    value
        .as_f64()
        .ok_or_else(|| type_error(format!("expected a number, got {value}")))
}

fn int(value: &Value) -> Result<i64, RemoteError> {
    value
        .as_i64()
        .ok_or_else(|| type_error(format!("expected an integer, got {value}")))
}

/// 1-based position to a 0-based index.
fn index(value: &Value) -> Result<usize, RemoteError> {
    let position = int(value)?;
    usize::try_from(position - 1).map_err(|_| type_error(format!("invalid position {position}")))
}

fn text(value: &Value) -> Result<&str, RemoteError> {
    value
        .as_str()
        .ok_or_else(|| type_error(format!("expected a string, got {value}")))
}

fn single_char(value: &Value) -> Result<char, RemoteError> {
    let s = text(value)?;
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(type_error(format!("expected one character, got {s:?}"))),
    }
}

fn words(value: &Value) -> Result<Vec<&str>, RemoteError> {
    value
        .as_array()
        .ok_or_else(|| type_error("wordbank must be a list"))?
        .iter()
        .map(text)
        .collect()
}

fn int_list(value: &Value) -> Result<Vec<i64>, RemoteError> {
    value
        .as_array()
        .ok_or_else(|| type_error("values must be a list"))?
        .iter()
        .map(int)
        .collect()
}

fn matrix(value: &Value) -> Result<Vec<Vec<f64>>, RemoteError> {
    let rows = value
        .as_array()
        .ok_or_else(|| type_error("array must be a list of rows"))?
        .iter()
        .map(|row| {
            row.as_array()
                .ok_or_else(|| type_error("array rows must be lists"))?
                .iter()
                .map(number)
                .collect::<Result<Vec<f64>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;
    if rows.windows(2).any(|pair| pair[0].len() != pair[1].len()) {
        return Err(type_error("array rows must have equal length"));
    }
    Ok(rows)
}
