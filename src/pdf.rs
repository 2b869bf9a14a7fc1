use std::io::BufWriter;

use printpdf::*;

use crate::error::{Result, TakeonError};
use crate::fmt::{long_date, opt_date, percent};
use crate::models::Complex;
use crate::report::{HeadingGroup, Progress};

// A4 dimensions (mm)
const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN_TOP: f32 = 20.0;
const MARGIN_BOTTOM: f32 = 20.0;
const MARGIN_LEFT: f32 = 18.0;
const MARGIN_RIGHT: f32 = 18.0;
const ROW_H: f32 = 5.0;
const FONT_SIZE: f32 = 9.5;
const TITLE_SIZE: f32 = 16.0;
const SUBTITLE_SIZE: f32 = 10.0;

fn approx_text_width(text: &str, size: f32) -> f32 {
    text.len() as f32 * size * 0.18
}

/// Characters of `size` text that fit in `width` mm.
fn chars_for_width(width: f32, size: f32) -> usize {
    ((width - 2.0) / (size * 0.18)).max(8.0) as usize
}

#[derive(Clone, Copy)]
enum Align {
    Left,
    Right,
}

struct Col {
    width: f32,
    align: Align,
}

struct PdfWriter {
    doc: PdfDocumentReference,
    font: IndirectFontRef,
    font_bold: IndirectFontRef,
    current_page: PdfPageIndex,
    current_layer: PdfLayerIndex,
    y: f32,
}

impl PdfWriter {
    fn new(title: &str) -> Result<Self> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| TakeonError::Pdf(format!("{e:?}")))?;
        let font_bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| TakeonError::Pdf(format!("{e:?}")))?;
        Ok(Self {
            doc,
            font,
            font_bold,
            current_page: page,
            current_layer: layer,
            y: MARGIN_TOP,
        })
    }

    fn pdf_y(&self) -> f32 {
        PAGE_H - self.y
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Layer");
        self.current_page = page;
        self.current_layer = layer;
        self.y = MARGIN_TOP;
    }

    fn ensure_space(&mut self, needed: f32) {
        if self.y + needed > PAGE_H - MARGIN_BOTTOM {
            self.new_page();
        }
    }

    fn text(&self, s: &str, x: f32, size: f32, bold: bool) {
        let font = if bold {
            self.font_bold.clone()
        } else {
            self.font.clone()
        };
        let layer = self
            .doc
            .get_page(self.current_page)
            .get_layer(self.current_layer);
        layer.use_text(s, size, Mm(x), Mm(self.pdf_y()), &font);
    }

    fn hline(&self, x1: f32, x2: f32) {
        let layer = self
            .doc
            .get_page(self.current_page)
            .get_layer(self.current_layer);
        layer.set_outline_thickness(0.5);
        let line = Line {
            points: vec![
                (Point::new(Mm(x1), Mm(self.pdf_y())), false),
                (Point::new(Mm(x2), Mm(self.pdf_y())), false),
            ],
            is_closed: false,
        };
        layer.add_line(line);
    }

    fn header(&mut self, title: &str, agent: &str, lines: &[String]) {
        self.text(title, MARGIN_LEFT, TITLE_SIZE, true);
        self.y += 7.0;
        if !agent.is_empty() {
            self.text(agent, MARGIN_LEFT, SUBTITLE_SIZE, false);
            self.y += 5.0;
        }
        for line in lines {
            self.text(line, MARGIN_LEFT, SUBTITLE_SIZE, false);
            self.y += 5.0;
        }
        let ts = chrono::Local::now()
            .format("Generated %d %B %Y %H:%M")
            .to_string();
        self.text(&ts, MARGIN_LEFT, 8.0, false);
        self.y += 5.0;
        self.hline(MARGIN_LEFT, PAGE_W - MARGIN_RIGHT);
        self.y += 5.0;
    }

    fn paragraph(&mut self, text: &str) {
        let width = chars_for_width(PAGE_W - MARGIN_LEFT - MARGIN_RIGHT, FONT_SIZE);
        for line in textwrap::wrap(text, width) {
            self.ensure_space(ROW_H);
            self.text(&line, MARGIN_LEFT, FONT_SIZE, false);
            self.y += ROW_H;
        }
        self.y += 2.0;
    }

    fn table_header(&mut self, cols: &[Col], headers: &[&str]) {
        self.ensure_space(ROW_H * 2.0);
        let mut x = MARGIN_LEFT;
        for (i, col) in cols.iter().enumerate() {
            if i < headers.len() {
                match col.align {
                    Align::Left => self.text(headers[i], x, FONT_SIZE, true),
                    Align::Right => {
                        let tw = approx_text_width(headers[i], FONT_SIZE);
                        self.text(headers[i], x + col.width - tw, FONT_SIZE, true);
                    }
                }
            }
            x += col.width;
        }
        self.y += ROW_H;
        self.hline(MARGIN_LEFT, PAGE_W - MARGIN_RIGHT);
        self.y += 2.0;
    }

    /// One table row; left-aligned cells longer than their column wrap onto
    /// extra lines and the row grows to fit.
    fn table_row(&mut self, cols: &[Col], values: &[&str], bold: bool) {
        let cells: Vec<Vec<String>> = cols
            .iter()
            .zip(values)
            .map(|(col, value)| match col.align {
                Align::Left => textwrap::wrap(value, chars_for_width(col.width, FONT_SIZE))
                    .into_iter()
                    .map(|l| l.into_owned())
                    .collect(),
                Align::Right => vec![value.to_string()],
            })
            .collect();
        let lines = cells.iter().map(Vec::len).max().unwrap_or(1).max(1);
        self.ensure_space(ROW_H * lines as f32);

        let top = self.y;
        let mut x = MARGIN_LEFT;
        for (col, cell) in cols.iter().zip(&cells) {
            self.y = top;
            for line in cell {
                match col.align {
                    Align::Left => self.text(line, x, FONT_SIZE, bold),
                    Align::Right => {
                        let tw = approx_text_width(line, FONT_SIZE);
                        self.text(line, x + col.width - tw, FONT_SIZE, bold);
                    }
                }
                self.y += ROW_H;
            }
            x += col.width;
        }
        self.y = top + ROW_H * lines as f32;
    }

    fn section_label(&mut self, label: &str) {
        self.ensure_space(ROW_H * 2.0);
        self.text(label, MARGIN_LEFT, FONT_SIZE + 1.0, true);
        self.y += ROW_H;
    }

    fn blank_row(&mut self) {
        self.y += ROW_H;
    }

    fn separator(&mut self) {
        self.hline(MARGIN_LEFT, PAGE_W - MARGIN_RIGHT);
        self.y += 2.0;
    }

    fn to_bytes(self) -> Result<Vec<u8>> {
        let mut buf = BufWriter::new(Vec::new());
        self.doc
            .save(&mut buf)
            .map_err(|e| TakeonError::Pdf(format!("{e:?}")))?;
        buf.into_inner().map_err(|e| TakeonError::Pdf(e.to_string()))
    }
}

fn complex_lines(complex: &Complex) -> Vec<String> {
    let mut lines = vec![format!("{} ({})", complex.name, complex.complex_type)];
    if let Some(code) = complex.building_code.as_deref().filter(|c| !c.is_empty()) {
        lines.push(format!("Building code: {code}"));
    }
    if let Some(address) = complex.address.as_deref().filter(|a| !a.is_empty()) {
        lines.push(address.to_string());
    }
    lines.push(format!(
        "Take-on date: {}    Financial year-end: {}",
        long_date(complex.take_on_date),
        complex.year_end
    ));
    lines
}

// ---------------------------------------------------------------------------
// Render functions
// ---------------------------------------------------------------------------

/// Handover request to the previous agent: outstanding items by heading.
pub fn render_handover_request(complex: &Complex, groups: &[HeadingGroup], agent: &str) -> Result<Vec<u8>> {
    let mut pdf = PdfWriter::new("Handover Request")?;
    pdf.header("Handover Request", agent, &complex_lines(complex));

    let to = complex.previous_agent.as_deref().unwrap_or("the previous managing agent");
    let from = if agent.is_empty() { "the new managing agent" } else { agent };
    pdf.paragraph(&format!(
        "To {to}: {} takes over management of {} with effect from {}. \
         Please hand over the records and documents listed below.",
        from,
        complex.name,
        long_date(complex.take_on_date)
    ));

    let cols = &[
        Col { width: 8.0, align: Align::Right },
        Col { width: 4.0, align: Align::Left },
        Col { width: 122.0, align: Align::Left },
        Col { width: 40.0, align: Align::Left },
    ];
    let mut n = 0;
    for group in groups {
        pdf.section_label(&group.heading);
        pdf.table_header(cols, &["#", "", "Item", "Responsibility"]);
        for item in &group.items {
            n += 1;
            let num = n.to_string();
            pdf.table_row(cols, &[&num, "", &item.task_name, &item.responsibility], false);
        }
        pdf.blank_row();
    }
    if n == 0 {
        pdf.paragraph("All items have been received.");
    }

    pdf.to_bytes()
}

/// Status report of every checklist item.
pub fn render_status_report(
    complex: &Complex,
    groups: &[HeadingGroup],
    progress: &Progress,
    agent: &str,
) -> Result<Vec<u8>> {
    let mut pdf = PdfWriter::new("Take-On Status Report")?;
    let mut lines = complex_lines(complex);
    lines.push(format!(
        "Received {} of {} ({}), {} outstanding",
        progress.received,
        progress.total,
        percent(progress.received, progress.total),
        progress.outstanding
    ));
    pdf.header("Take-On Status Report", agent, &lines);

    let cols = &[
        Col { width: 84.0, align: Align::Left },
        Col { width: 22.0, align: Align::Left },
        Col { width: 30.0, align: Align::Left },
        Col { width: 38.0, align: Align::Left },
    ];
    for group in groups {
        pdf.section_label(&group.heading);
        pdf.table_header(cols, &["Item", "Received", "Responsibility", "Notes"]);
        for item in &group.items {
            let received = if item.received {
                opt_date(item.date_received)
            } else {
                "Outstanding".to_string()
            };
            pdf.table_row(
                cols,
                &[&item.task_name, &received, &item.responsibility, &item.notes],
                false,
            );
        }
        pdf.blank_row();
    }

    pdf.separator();
    let summary = format!("{} outstanding", progress.outstanding);
    pdf.table_row(cols, &["Total items", &progress.total.to_string(), "", &summary], true);

    pdf.to_bytes()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::{ChecklistItem, ComplexType};
    use crate::report::group_by_heading;
    use crate::seeder::seed_checklist;

    fn complex() -> Complex {
        let mut c = Complex::new(
            "Sunset Villas",
            ComplexType::BodyCorporate,
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            "February",
        );
        c.building_code = Some("SV01".to_string());
        c
    }

    fn items() -> Vec<ChecklistItem> {
        let mut items = seed_checklist(&complex(), &[]).items;
        items[0].set_received(true, NaiveDate::from_ymd_opt(2024, 3, 20).unwrap());
        items[0].notes = "Delivered in 4 archive boxes, see courier waybill".to_string();
        items
    }

    #[test]
    fn test_render_handover_request_produces_pdf() {
        let items = items();
        let outstanding: Vec<ChecklistItem> = items.iter().filter(|i| !i.received).cloned().collect();
        let groups = group_by_heading(&outstanding);
        let bytes = render_handover_request(&complex(), &groups, "Acme Managing Agents").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_handover_request_with_nothing_outstanding() {
        let bytes = render_handover_request(&complex(), &[], "").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_status_report_produces_pdf() {
        let items = items();
        let groups = group_by_heading(&items);
        let progress = Progress::of(&items);
        let bytes = render_status_report(&complex(), &groups, &progress, "Acme").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_long_checklist_spans_pages() {
        let many: Vec<ChecklistItem> = (0..150)
            .map(|i| ChecklistItem::new("Sunset Villas", &format!("Task number {i}"), "General", "Previous Agent"))
            .collect();
        let groups = group_by_heading(&many);
        let bytes = render_status_report(&complex(), &groups, &Progress::of(&many), "").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
