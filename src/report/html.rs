//! Static HTML rendering. The document is emitted as quick-xml events so every piece
//! of schema text goes through the writer's escaping.

use std::io::Write;

use chrono::{DateTime, Utc};
use quick_xml::{
    Writer,
    events::{BytesEnd, BytesStart, BytesText, Event},
};

use crate::{
    merge::Row,
    report::{Report, Section},
};

const STYLE: &str = "
body { font-family: sans-serif; margin: 2em; }
table { border-collapse: collapse; margin-bottom: 2em; }
th, td { border: 1px solid #ccc; padding: 0.25em 0.75em; text-align: left; }
th { background: #f0f0f0; }
tr.creator td { background: #eef6ff; }
td.unmapped { color: #999; font-style: italic; }
code { font-size: 0.95em; }
";

pub fn write<W: Write>(report: &Report, generated: DateTime<Utc>, mut out: W) -> anyhow::Result<()> {
    out.write_all(b"<!DOCTYPE html>\n")?;
    let mut w = Writer::new_with_indent(out, b' ', 2);

    let title = match report.version {
        Some(v) => format!("Zotero → CSL mapping (schema version {v})"),
        None => "Zotero → CSL mapping".to_string(),
    };

    start(&mut w, "html", &[("lang", "en")])?;
    start(&mut w, "head", &[])?;
    w.write_event(Event::Empty(
        BytesStart::new("meta").with_attributes([("charset", "utf-8")]),
    ))?;
    text_element(&mut w, "title", &[], &title)?;
    text_element(&mut w, "style", &[], STYLE)?;
    end(&mut w, "head")?;

    start(&mut w, "body", &[])?;
    text_element(&mut w, "h1", &[], &title)?;
    text_element(
        &mut w,
        "p",
        &[],
        &format!("Locale {} · source {}", report.locale, report.source),
    )?;

    write_toc(&mut w, &report.sections)?;
    for section in &report.sections {
        write_section(&mut w, section)?;
    }

    text_element(
        &mut w,
        "footer",
        &[],
        &format!(
            "Generated {} · {} item types · {} rows without a CSL mapping",
            generated.format("%Y-%m-%d %H:%M UTC"),
            report.sections.len(),
            report.unmapped()
        ),
    )?;
    end(&mut w, "body")?;
    end(&mut w, "html")?;

    w.into_inner().write_all(b"\n")?;
    Ok(())
}

fn write_toc<W: Write>(w: &mut Writer<W>, sections: &[Section]) -> anyhow::Result<()> {
    start(w, "nav", &[("id", "contents")])?;
    text_element(w, "h2", &[], "Item types")?;
    start(w, "ul", &[])?;
    for section in sections {
        let href = format!("#{}", section.anchor());
        start(w, "li", &[])?;
        text_element(w, "a", &[("href", href.as_str())], &section.label)?;
        end(w, "li")?;
    }
    end(w, "ul")?;
    end(w, "nav")
}

fn write_section<W: Write>(w: &mut Writer<W>, section: &Section) -> anyhow::Result<()> {
    let anchor = section.anchor();
    start(w, "section", &[("id", anchor.as_str())])?;
    text_element(w, "h2", &[], &format!("{} ({})", section.label, section.key))?;
    text_element(w, "p", &[], &format!("CSL type: {}", section.csl_type))?;

    start(w, "table", &[])?;
    start(w, "thead", &[])?;
    start(w, "tr", &[])?;
    for heading in ["Label", "Key", "CSL variable"] {
        text_element(w, "th", &[], heading)?;
    }
    end(w, "tr")?;
    end(w, "thead")?;

    start(w, "tbody", &[])?;
    for row in &section.rows {
        write_row(w, row)?;
    }
    end(w, "tbody")?;
    end(w, "table")?;

    start(w, "p", &[])?;
    text_element(w, "a", &[("href", "#contents")], "Back to contents")?;
    end(w, "p")?;
    end(w, "section")
}

fn write_row<W: Write>(w: &mut Writer<W>, row: &Row) -> anyhow::Result<()> {
    start(w, "tr", &[("class", row.kind.as_str())])?;
    text_element(w, "td", &[], &row.label)?;

    start(w, "td", &[])?;
    text_element(w, "code", &[], &row.display_key())?;
    end(w, "td")?;

    let mapping = row.mapping.to_string();
    if row.mapping.is_mapped() {
        start(w, "td", &[])?;
        text_element(w, "code", &[], &mapping)?;
        end(w, "td")?;
    } else {
        text_element(w, "td", &[("class", "unmapped")], &mapping)?;
    }

    end(w, "tr")
}

fn start<W: Write>(w: &mut Writer<W>, name: &str, attrs: &[(&str, &str)]) -> anyhow::Result<()> {
    w.write_event(Event::Start(
        BytesStart::new(name).with_attributes(attrs.iter().copied()),
    ))?;
    Ok(())
}

fn end<W: Write>(w: &mut Writer<W>, name: &str) -> anyhow::Result<()> {
    w.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn text_element<W: Write>(
    w: &mut Writer<W>,
    name: &str,
    attrs: &[(&str, &str)],
    text: &str,
) -> anyhow::Result<()> {
    start(w, name, attrs)?;
    w.write_event(Event::Text(BytesText::new(text)))?;
    end(w, name)
}
