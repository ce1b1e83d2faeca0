//! Document assembler: renders a clinic profile plus an invoice draft into
//! a two-page A4 PDF (summary page + detailed session log) and writes it
//! under the configured file name.
//!
//! Layout is a fixed sequence of drawing calls in top-down millimetre
//! coordinates, converted to printpdf's bottom-up system at the edges.

mod format;

pub use format::{
    format_currency, format_date, format_date_long, format_date_short, invoice_file_name,
    invoice_number, weekday_short, wrap_text,
};

use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Polygon, Rgb,
};
use thiserror::Error;

use crate::models::{ClinicSettings, ComputedTotals, InvoiceDraft};

/// Document assembly errors.
#[derive(Error, Debug)]
pub enum PdfError {
    #[error("PDF render error: {0}")]
    Render(String),

    #[error("Draft has no bill date")]
    MissingBillDate,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PdfResult<T> = Result<T, PdfError>;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

/// Render the two-page invoice document as PDF bytes.
pub fn render_invoice(settings: &ClinicSettings, draft: &InvoiceDraft) -> PdfResult<Vec<u8>> {
    let totals = ComputedTotals::from_draft(draft);

    let (doc, page1, layer1) =
        PdfDocument::new("Invoice", Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let fonts = Fonts::load(&doc)?;

    let layer = doc.get_page(page1).get_layer(layer1);
    draw_summary_page(&layer, &fonts, settings, draft, &totals);

    let (page2, layer2) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let layer = doc.get_page(page2).get_layer(layer2);
    draw_session_log_page(&doc, layer, &fonts, settings, draft, &totals);

    let mut writer = BufWriter::new(Vec::<u8>::new());
    doc.save(&mut writer)
        .map_err(|e| PdfError::Render(e.to_string()))?;
    writer
        .into_inner()
        .map_err(|e| PdfError::Render(e.to_string()))
}

/// Render and write `Invoice_<patient>_<bill-date>.pdf` under `dir`,
/// returning the written path.
pub fn save_invoice(
    settings: &ClinicSettings,
    draft: &InvoiceDraft,
    dir: &Path,
) -> PdfResult<PathBuf> {
    let bill_date = draft.bill_date.ok_or(PdfError::MissingBillDate)?;
    let bytes = render_invoice(settings, draft)?;

    fs::create_dir_all(dir)?;
    let path = dir.join(invoice_file_name(&draft.patient_name, bill_date));
    fs::write(&path, bytes)?;
    Ok(path)
}

// =========================================================================
// Drawing primitives
// =========================================================================

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
}

impl Fonts {
    fn load(doc: &PdfDocumentReference) -> PdfResult<Self> {
        let load = |f: BuiltinFont| {
            doc.add_builtin_font(f)
                .map_err(|e| PdfError::Render(e.to_string()))
        };
        Ok(Self {
            regular: load(BuiltinFont::Helvetica)?,
            bold: load(BuiltinFont::HelveticaBold)?,
            italic: load(BuiltinFont::HelveticaOblique)?,
        })
    }
}

fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb(Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}

fn teal() -> Color {
    rgb(0, 128, 128)
}

fn gray_text() -> Color {
    rgb(100, 100, 100)
}

fn dark_text() -> Color {
    rgb(30, 30, 30)
}

fn white() -> Color {
    rgb(255, 255, 255)
}

/// Top-down y to printpdf's bottom-up coordinate.
fn from_top(y: f32) -> Mm {
    Mm(PAGE_HEIGHT - y)
}

/// Approximate Helvetica text width in mm (average glyph ~0.5 em).
fn approx_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.5 * 0.3528
}

fn text(layer: &PdfLayerReference, font: &IndirectFontRef, s: &str, size: f32, x: f32, y: f32) {
    layer.use_text(s, size, Mm(x), from_top(y), font);
}

fn text_right(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    s: &str,
    size: f32,
    right_edge: f32,
    y: f32,
) {
    text(layer, font, s, size, right_edge - approx_width(s, size), y);
}

fn text_centered(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    s: &str,
    size: f32,
    center_x: f32,
    y: f32,
) {
    text(layer, font, s, size, center_x - approx_width(s, size) / 2.0, y);
}

/// Filled rectangle in the current fill color; (x, y) is the top-left corner.
fn fill_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32) {
    layer.add_polygon(Polygon {
        rings: vec![vec![
            (Point::new(Mm(x), from_top(y)), false),
            (Point::new(Mm(x + w), from_top(y)), false),
            (Point::new(Mm(x + w), from_top(y + h)), false),
            (Point::new(Mm(x), from_top(y + h)), false),
        ]],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    });
}

/// Horizontal rule in the current outline color.
fn hline(layer: &PdfLayerReference, x1: f32, x2: f32, y: f32) {
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(x1), from_top(y)), false),
            (Point::new(Mm(x2), from_top(y)), false),
        ],
        is_closed: false,
    });
}

fn vline(layer: &PdfLayerReference, x: f32, y1: f32, y2: f32) {
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(x), from_top(y1)), false),
            (Point::new(Mm(x), from_top(y2)), false),
        ],
        is_closed: false,
    });
}

// =========================================================================
// Shared header band
// =========================================================================

/// Teal letterhead band: clinic identity on the left, contact block
/// right-aligned.
fn draw_header(layer: &PdfLayerReference, fonts: &Fonts, settings: &ClinicSettings) {
    layer.set_fill_color(teal());
    fill_rect(layer, 0.0, 0.0, PAGE_WIDTH, 45.0);

    layer.set_fill_color(white());
    let clinic_name = if settings.clinic_name.is_empty() {
        "Your Clinic Name"
    } else {
        &settings.clinic_name
    };
    text(layer, &fonts.bold, clinic_name, 22.0, MARGIN, 18.0);

    if !settings.tagline.is_empty() {
        text(layer, &fonts.italic, &settings.tagline, 10.0, MARGIN, 26.0);
    }

    if !settings.doctors.is_empty() {
        let names: Vec<&str> = settings.doctors.iter().map(|d| d.name.as_str()).collect();
        text(layer, &fonts.regular, &names.join(" | "), 9.0, MARGIN, 34.0);
    }

    let mut right_y = 15.0;
    if !settings.phone.is_empty() {
        let line = format!("Tel: {}", settings.phone);
        text_right(layer, &fonts.regular, &line, 8.0, PAGE_WIDTH - MARGIN, right_y);
        right_y += 5.0;
    }
    if !settings.email.is_empty() {
        let line = format!("Email: {}", settings.email);
        text_right(layer, &fonts.regular, &line, 8.0, PAGE_WIDTH - MARGIN, right_y);
        right_y += 5.0;
    }
    if !settings.address.is_empty() {
        // 60mm column at 8pt
        for line in wrap_text(&settings.address, 42) {
            text_right(layer, &fonts.regular, &line, 8.0, PAGE_WIDTH - MARGIN, right_y);
            right_y += 4.0;
        }
    }
}

// =========================================================================
// Page 1: summary
// =========================================================================

fn draw_summary_page(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    settings: &ClinicSettings,
    draft: &InvoiceDraft,
    totals: &ComputedTotals,
) {
    draw_header(layer, fonts, settings);

    // Invoice banner
    let mut y = 55.0;
    layer.set_fill_color(rgb(240, 240, 240));
    fill_rect(layer, MARGIN, y - 5.0, CONTENT_WIDTH, 18.0);

    layer.set_fill_color(teal());
    text(layer, &fonts.bold, "INVOICE / RECEIPT", 16.0, 22.0, y + 6.0);

    layer.set_fill_color(gray_text());
    let number_line = format!("Invoice No: {}", invoice_number());
    text_right(layer, &fonts.regular, &number_line, 10.0, PAGE_WIDTH - 22.0, y + 2.0);
    let date_line = format!("Date: {}", format_date(draft.bill_date));
    text_right(layer, &fonts.regular, &date_line, 10.0, PAGE_WIDTH - 22.0, y + 8.0);

    // Patient information
    y += 22.0;
    draw_section_band(layer, fonts, "PATIENT INFORMATION", y);
    y += 12.0;

    layer.set_outline_color(rgb(200, 200, 200));
    layer.set_outline_thickness(0.5);
    layer.set_fill_color(rgb(252, 252, 252));
    fill_rect(layer, MARGIN, y, CONTENT_WIDTH, 32.0);

    let col1_label = 22.0;
    let col1_value = col1_label + 32.0;
    let col2_label = PAGE_WIDTH / 2.0 + 5.0;
    let col2_value = col2_label + 22.0;

    let field = |label: &str, value: &str, label_x: f32, value_x: f32, y: f32| {
        layer.set_fill_color(gray_text());
        text(layer, &fonts.bold, label, 9.0, label_x, y);
        layer.set_fill_color(dark_text());
        text(layer, &fonts.regular, value, 9.0, value_x, y);
    };

    y += 7.0;
    let name = if draft.patient_name.is_empty() {
        "-"
    } else {
        &draft.patient_name
    };
    field("Patient Name:", name, col1_label, col1_value, y);
    field(
        "Bill Date:",
        &format_date(draft.bill_date),
        col2_label,
        col2_value,
        y,
    );

    y += 7.0;
    let age = if draft.age.is_empty() { "-" } else { &draft.age };
    let gender = draft
        .gender
        .map(|g| g.to_string())
        .unwrap_or_else(|| "-".to_string());
    field(
        "Age / Gender:",
        &format!("{} yrs / {}", age, gender),
        col1_label,
        col1_value,
        y,
    );
    field(
        "Ref. Date:",
        &format_date(draft.reference_date),
        col2_label,
        col2_value,
        y,
    );

    y += 7.0;
    let referred_by = if draft.referred_by.trim().is_empty() {
        "Self"
    } else {
        &draft.referred_by
    };
    field("Referred By:", referred_by, col1_label, col1_value, y);
    let period = match (draft.start_date, draft.end_date) {
        (Some(start), Some(end)) => {
            format!("{} - {}", format_date_short(start), format_date_short(end))
        }
        _ => "-".to_string(),
    };
    field("Period:", &period, col2_label, col2_value, y);

    y += 7.0;
    field(
        "Total Days:",
        &format!("{} days", draft.total_days()),
        col1_label,
        col1_value,
        y,
    );
    field(
        "Sessions/Day:",
        &draft.sessions_per_day.to_string(),
        col2_label,
        col2_label + 28.0,
        y,
    );

    // Condition and treatment free-text blocks
    y += 15.0;
    y = draw_text_block(layer, fonts, "CONDITION / DIAGNOSIS", &draft.condition, y) + 6.0;
    y = draw_text_block(layer, fonts, "TREATMENT PROVIDED", &draft.treatment, y) + 8.0;

    // Billing table: one row
    draw_section_band(layer, fonts, "BILLING DETAILS", y);
    y += 12.0;
    y = draw_billing_table(layer, fonts, draft, totals, y);

    layer.set_fill_color(dark_text());
    let grand_total = format!("Grand Total: Rs. {}", format_currency(totals.total_amount));
    text_right(layer, &fonts.bold, &grand_total, 12.0, PAGE_WIDTH - 20.0, y + 10.0);

    // Signature and footer, pinned to the bottom
    let footer_y = PAGE_HEIGHT - 50.0;
    layer.set_outline_color(rgb(200, 200, 200));
    layer.set_outline_thickness(0.5);
    hline(layer, MARGIN, PAGE_WIDTH - MARGIN, footer_y - 5.0);

    layer.set_fill_color(dark_text());
    text_centered(
        layer,
        &fonts.bold,
        "Authorized Signature",
        10.0,
        PAGE_WIDTH - 55.0,
        footer_y + 5.0,
    );
    layer.set_outline_color(gray_text());
    hline(layer, PAGE_WIDTH - 85.0, PAGE_WIDTH - 25.0, footer_y + 22.0);

    if let Some(doctor) = settings.signing_doctor() {
        layer.set_fill_color(gray_text());
        text_centered(
            layer,
            &fonts.regular,
            &doctor.name,
            8.0,
            PAGE_WIDTH - 55.0,
            footer_y + 28.0,
        );
    }

    layer.set_fill_color(teal());
    fill_rect(layer, 0.0, PAGE_HEIGHT - 12.0, PAGE_WIDTH, 12.0);
    layer.set_fill_color(white());
    let footer_text = if settings.clinic_hours.is_empty() {
        "Thank you for choosing us!".to_string()
    } else {
        format!("Hours: {}", settings.clinic_hours)
    };
    text_centered(
        layer,
        &fonts.regular,
        &footer_text,
        8.0,
        PAGE_WIDTH / 2.0,
        PAGE_HEIGHT - 4.0,
    );
}

/// Teal section title band.
fn draw_section_band(layer: &PdfLayerReference, fonts: &Fonts, title: &str, y: f32) {
    layer.set_fill_color(teal());
    fill_rect(layer, MARGIN, y, CONTENT_WIDTH, 8.0);
    layer.set_fill_color(white());
    text(layer, &fonts.bold, title, 10.0, 20.0, y + 5.5);
}

/// Section band plus wrapped free text; returns the y after the block.
fn draw_text_block(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    title: &str,
    body: &str,
    y: f32,
) -> f32 {
    draw_section_band(layer, fonts, title, y);
    let mut y = y + 12.0;

    layer.set_fill_color(dark_text());
    let body = if body.trim().is_empty() {
        "Not specified"
    } else {
        body
    };
    // 160mm column at 10pt
    let lines = wrap_text(body, 90);
    for (i, line) in lines.iter().enumerate() {
        text(layer, &fonts.regular, line, 10.0, 20.0, y + i as f32 * 5.0);
    }
    y += (lines.len() as f32 * 5.0).max(6.0);
    y
}

/// One-row billing table; returns the y after the table.
fn draw_billing_table(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    draft: &InvoiceDraft,
    totals: &ComputedTotals,
    y: f32,
) -> f32 {
    let xs = [MARGIN, 95.0, 125.0, 160.0, PAGE_WIDTH - MARGIN];
    let head_h = 8.0;
    let row_h = 10.0;

    layer.set_fill_color(rgb(80, 80, 80));
    fill_rect(layer, xs[0], y, xs[4] - xs[0], head_h);

    layer.set_fill_color(white());
    let headers = ["Description", "Days", "Sessions/Day", "Amount"];
    for (i, header) in headers.iter().enumerate() {
        let center = (xs[i] + xs[i + 1]) / 2.0;
        text_centered(layer, &fonts.bold, header, 9.0, center, y + 5.5);
    }

    let row_y = y + head_h;
    layer.set_fill_color(dark_text());
    text(
        layer,
        &fonts.regular,
        "Physiotherapy Treatment Sessions",
        9.0,
        xs[0] + 3.0,
        row_y + 6.5,
    );
    let cells = [
        draft.total_days().to_string(),
        draft.sessions_per_day.to_string(),
        format!("Rs. {}", format_currency(totals.total_amount)),
    ];
    for (i, cell) in cells.iter().enumerate() {
        let center = (xs[i + 1] + xs[i + 2]) / 2.0;
        text_centered(layer, &fonts.regular, cell, 9.0, center, row_y + 6.5);
    }

    // Grid
    layer.set_outline_color(rgb(200, 200, 200));
    layer.set_outline_thickness(0.3);
    let bottom = row_y + row_h;
    hline(layer, xs[0], xs[4], y);
    hline(layer, xs[0], xs[4], row_y);
    hline(layer, xs[0], xs[4], bottom);
    for &x in &xs {
        vline(layer, x, y, bottom);
    }

    bottom
}

// =========================================================================
// Page 2: detailed session log
// =========================================================================

const LOG_COLS: [f32; 5] = [MARGIN, 65.0, 100.0, 140.0, 190.0];
const LOG_ROW_H: f32 = 7.0;
/// Last row top that still leaves room for the totals lines.
const LOG_PAGE_LIMIT: f32 = 265.0;

fn draw_session_log_page(
    doc: &PdfDocumentReference,
    mut layer: PdfLayerReference,
    fonts: &Fonts,
    settings: &ClinicSettings,
    draft: &InvoiceDraft,
    totals: &ComputedTotals,
) {
    draw_header(&layer, fonts, settings);

    let mut y = 55.0;
    layer.set_fill_color(rgb(240, 240, 240));
    fill_rect(&layer, MARGIN, y - 5.0, CONTENT_WIDTH, 14.0);
    layer.set_fill_color(teal());
    text(&layer, &fonts.bold, "DETAILED SESSION LOG", 14.0, 22.0, y + 4.0);

    y += 18.0;
    layer.set_fill_color(dark_text());
    let patient_line = format!("Patient: {}", draft.patient_name);
    text(&layer, &fonts.bold, &patient_line, 11.0, MARGIN, y);

    y += 10.0;
    draw_log_table_header(&layer, fonts, y);
    y += 8.0;

    let day_total = f64::from(draft.sessions_per_day) * draft.charge_per_session;
    for (i, &date) in draft.selected_dates.iter().enumerate() {
        if y + LOG_ROW_H > LOG_PAGE_LIMIT {
            // Long session logs continue on extra pages.
            let (page, layer_idx) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            layer = doc.get_page(page).get_layer(layer_idx);
            y = 20.0;
            draw_log_table_header(&layer, fonts, y);
            y += 8.0;
        }

        if i % 2 == 1 {
            layer.set_fill_color(rgb(248, 250, 250));
            fill_rect(&layer, LOG_COLS[0], y, LOG_COLS[4] - LOG_COLS[0], LOG_ROW_H);
        }

        layer.set_fill_color(dark_text());
        let cells = [
            format_date_long(date),
            weekday_short(date),
            draft.sessions_per_day.to_string(),
            format!("Rs. {}", format_currency(day_total)),
        ];
        for (col, cell) in cells.iter().enumerate() {
            let center = (LOG_COLS[col] + LOG_COLS[col + 1]) / 2.0;
            text_centered(&layer, &fonts.regular, cell, 9.0, center, y + 5.0);
        }
        y += LOG_ROW_H;
    }

    y += 15.0;
    layer.set_fill_color(dark_text());
    let sessions_line = format!("Total Sessions: {}", totals.total_sessions);
    text_right(&layer, &fonts.bold, &sessions_line, 11.0, PAGE_WIDTH - 20.0, y);

    y += 8.0;
    let total_line = format!("Final Total: Rs. {}", format_currency(totals.total_amount));
    text_right(&layer, &fonts.bold, &total_line, 12.0, PAGE_WIDTH - 20.0, y);
}

fn draw_log_table_header(layer: &PdfLayerReference, fonts: &Fonts, y: f32) {
    layer.set_fill_color(teal());
    fill_rect(layer, LOG_COLS[0], y, LOG_COLS[4] - LOG_COLS[0], 8.0);

    layer.set_fill_color(white());
    let headers = ["Date", "Day", "Sessions", "Daily Total"];
    for (i, header) in headers.iter().enumerate() {
        let center = (LOG_COLS[i] + LOG_COLS[i + 1]) / 2.0;
        text_centered(layer, &fonts.bold, header, 9.0, center, y + 5.5);
    }
}
