//! CPLEX LP format writer.
//!
//! ```text
//! \ bison
//! Minimize
//!  obj: 12 s_0_0 + 12 s_1_0 + 4 r_0_0 + 4 r_1_0
//! Subject To
//!  min_sources: s_0_0 + s_1_0 >= 1
//!  ...
//! Bounds
//!  0 <= y_0_0_iso_1_0 <= 2
//! Binaries
//!  s_0_0 s_1_0 r_0_0 r_1_0
//! End
//! ```
//!
//! Expression constants move to the right-hand side; zero coefficients are
//! dropped.

use std::io::Write;
use std::path::Path;

use crate::model::{Domain, LinearExpr, LinearProgram, ObjectiveSense, Sense};

/// Save a program in LP format.
pub fn save_lp(program: &LinearProgram, path: &Path) -> std::io::Result<()> {
    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);
    write_lp(program, &mut writer)?;
    writer.flush()
}

/// Render a program as an LP-format string.
pub fn to_lp_string(program: &LinearProgram) -> String {
    let mut buffer = Vec::new();
    // Writing into a Vec cannot fail
    let _ = write_lp(program, &mut buffer);
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Write a program in LP format.
pub fn write_lp<W: Write>(program: &LinearProgram, writer: &mut W) -> std::io::Result<()> {
    writeln!(writer, "\\ {}", program.name)?;
    match program.objective.sense {
        ObjectiveSense::Minimize => writeln!(writer, "Minimize")?,
        ObjectiveSense::Maximize => writeln!(writer, "Maximize")?,
    }
    writeln!(writer, " obj: {}", render_expr(program, &program.objective.expr))?;

    writeln!(writer, "Subject To")?;
    for c in &program.constraints {
        let op = match c.sense {
            Sense::Le => "<=",
            Sense::Ge => ">=",
            Sense::Eq => "=",
        };
        writeln!(
            writer,
            " {}: {} {} {}",
            c.name,
            render_expr(program, &c.expr),
            op,
            format_number(c.rhs - c.expr.constant)
        )?;
    }

    writeln!(writer, "Bounds")?;
    for v in &program.variables {
        match v.domain {
            Domain::Binary if v.lower == 0.0 && v.upper == 1.0 => {}
            _ if v.lower == v.upper => {
                writeln!(writer, " {} = {}", v.name, format_number(v.lower))?;
            }
            _ => writeln!(
                writer,
                " {} <= {} <= {}",
                format_number(v.lower),
                v.name,
                format_number(v.upper)
            )?,
        }
    }

    let binaries: Vec<&str> = program
        .variables
        .iter()
        .filter(|v| v.domain == Domain::Binary)
        .map(|v| v.name.as_str())
        .collect();
    if !binaries.is_empty() {
        writeln!(writer, "Binaries")?;
        for chunk in binaries.chunks(10) {
            writeln!(writer, " {}", chunk.join(" "))?;
        }
    }
    writeln!(writer, "End")
}

fn render_expr(program: &LinearProgram, expr: &LinearExpr) -> String {
    let mut out = String::new();
    for (var, &coef) in &expr.terms {
        if coef == 0.0 {
            continue;
        }
        let name = program
            .variable(*var)
            .map_or_else(|| format!("x{}", var.0), |v| v.name.clone());
        let sign = if coef < 0.0 { "-" } else { "+" };
        let magnitude = coef.abs();
        if out.is_empty() {
            if coef < 0.0 {
                out.push_str("- ");
            }
        } else {
            out.push_str(&format!(" {} ", sign));
        }
        if magnitude == 1.0 {
            out.push_str(&name);
        } else {
            out.push_str(&format!("{} {}", format_number(magnitude), name));
        }
    }
    if out.is_empty() {
        // LP readers reject empty rows; an explicit zero term keeps them valid
        match program.variables.first() {
            Some(v) => out.push_str(&format!("0 {}", v.name)),
            None => out.push('0'),
        }
    }
    out
}

fn format_number(value: f64) -> String {
    if value == f64::INFINITY {
        "+inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        format!("{}", value)
    }
}
