use std::io::{self, Write};

use owo_colors::{OwoColorize, Stream};

use crate::{
    merge::{Row, RowKind},
    report::Report,
};

const RULE_WIDTH: usize = 60;

pub fn write<W: Write>(report: &Report, out: &mut W) -> io::Result<()> {
    for section in &report.sections {
        writeln!(out)?;
        writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
        let heading = format!("{} ({})", section.label, section.key);
        writeln!(
            out,
            "{}  {} {}",
            heading.if_supports_color(Stream::Stdout, |t| t.bold()),
            "CSL:".if_supports_color(Stream::Stdout, |t| t.dimmed()),
            section.csl_type
        )?;
        writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
        for row in &section.rows {
            write_row(row, out)?;
        }
    }
    Ok(())
}

fn write_row<W: Write>(row: &Row, out: &mut W) -> io::Result<()> {
    let kind = format!("{:8}", row.kind.as_str());
    let key = format!("{:30}", row.display_key());
    let label = format!("{:30}", row.label);
    let mapping = row.mapping.to_string();

    let kind = match row.kind {
        RowKind::Field => kind.if_supports_color(Stream::Stdout, |t| t.dimmed()).to_string(),
        RowKind::Creator => kind.if_supports_color(Stream::Stdout, |t| t.cyan()).to_string(),
    };
    let mapping = if row.mapping.is_mapped() {
        mapping.if_supports_color(Stream::Stdout, |t| t.green()).to_string()
    } else {
        mapping.if_supports_color(Stream::Stdout, |t| t.yellow()).to_string()
    };
    writeln!(out, "{kind} {key} {label} → {mapping}")
}
