mod pdf;

use crate::errors::ServiceError;
use crate::services::analytics::ExportSummary;
use crate::services::reports::ReportData;
use chrono::SecondsFormat;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::Workbook;

/// Download formats accepted by the export endpoints. `excel` is an
/// accepted alias for `xlsx`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Pdf,
    Xlsx,
}

impl ExportFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "csv" => Some(Self::Csv),
            "pdf" => Some(Self::Pdf),
            "xlsx" | "excel" => Some(Self::Xlsx),
            _ => None,
        }
    }
}

/// Rendered download with the headers the handler should attach
pub struct ExportFile {
    pub filename: &'static str,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

pub fn analytics_export(
    summary: &ExportSummary,
    format: ExportFormat,
) -> Result<ExportFile, ServiceError> {
    let file = match format {
        ExportFormat::Csv => ExportFile {
            filename: "analytics-export.csv",
            content_type: "text/csv; charset=utf-8",
            bytes: analytics_csv(summary)?,
        },
        ExportFormat::Pdf => ExportFile {
            filename: "analytics-export.pdf",
            content_type: "application/pdf",
            bytes: analytics_pdf(summary),
        },
        ExportFormat::Xlsx => ExportFile {
            filename: "analytics-export.xlsx",
            content_type: "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            bytes: analytics_xlsx(summary)?,
        },
    };
    Ok(file)
}

/// Reports only ship as CSV or PDF; any other requested format falls
/// back to PDF.
pub fn report_export(report: &ReportData, format: ExportFormat) -> Result<ExportFile, ServiceError> {
    let file = match format {
        ExportFormat::Csv => ExportFile {
            filename: "report.csv",
            content_type: "text/csv",
            bytes: report_csv(report)?,
        },
        ExportFormat::Pdf | ExportFormat::Xlsx => ExportFile {
            filename: "report.pdf",
            content_type: "application/pdf",
            bytes: report_pdf(report),
        },
    };
    Ok(file)
}

fn write_rows(rows: &[Vec<String>]) -> Result<Vec<u8>, ServiceError> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());
    for row in rows {
        writer.write_record(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| ServiceError::RenderError(e.to_string()))
}

/// Joins row sections with a blank line between them.
fn csv_sections(sections: &[Vec<Vec<String>>]) -> Result<Vec<u8>, ServiceError> {
    let mut out = Vec::new();
    for (i, section) in sections.iter().enumerate() {
        if i > 0 {
            out.push(b'\n');
        }
        out.extend(write_rows(section)?);
    }
    Ok(out)
}

fn analytics_csv(summary: &ExportSummary) -> Result<Vec<u8>, ServiceError> {
    let totals = vec![
        vec!["Analytics Export".to_string()],
        vec!["Total Items".to_string(), summary.total_items.to_string()],
        vec![
            "Low-Stock Items".to_string(),
            summary.low_stock_items.to_string(),
        ],
        vec!["Total Value".to_string(), summary.total_value.to_string()],
    ];

    let mut categories = vec![vec!["Category".to_string(), "Count".to_string()]];
    for (category, count) in &summary.category_counts {
        categories.push(vec![category.clone(), count.to_string()]);
    }

    csv_sections(&[totals, categories])
}

fn analytics_pdf(summary: &ExportSummary) -> Vec<u8> {
    let mut doc = pdf::PdfBuilder::new();
    doc.title("Analytics Export");
    doc.line(12.0, &format!("Total Items: {}", summary.total_items));
    doc.line(
        12.0,
        &format!("Low-Stock Items: {}", summary.low_stock_items),
    );
    doc.line(
        12.0,
        &format!("Total Inventory Value: {}", summary.total_value),
    );
    doc.gap();
    doc.heading("Category Breakdown");
    doc.gap();
    for (category, count) in &summary.category_counts {
        doc.text(&format!("{category}: {count}"));
    }
    doc.build()
}

fn analytics_xlsx(summary: &ExportSummary) -> Result<Vec<u8>, ServiceError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Analytics")?;
    sheet.set_column_width(0, 24)?;
    sheet.set_column_width(1, 16)?;

    sheet.write_string(0, 0, "Metric")?;
    sheet.write_string(0, 1, "Value")?;
    sheet.write_string(1, 0, "Total Items")?;
    sheet.write_number(1, 1, summary.total_items as f64)?;
    sheet.write_string(2, 0, "Low-Stock Items")?;
    sheet.write_number(2, 1, summary.low_stock_items as f64)?;
    sheet.write_string(3, 0, "Total Value")?;
    sheet.write_number(3, 1, summary.total_value.to_f64().unwrap_or(0.0))?;

    sheet.write_string(5, 0, "Category")?;
    sheet.write_string(5, 1, "Count")?;
    let mut current_row = 6;
    for (category, count) in &summary.category_counts {
        sheet.write_string(current_row, 0, category.as_str())?;
        sheet.write_number(current_row, 1, *count as f64)?;
        current_row += 1;
    }

    workbook.save_to_buffer().map_err(Into::into)
}

fn report_csv(report: &ReportData) -> Result<Vec<u8>, ServiceError> {
    let stamp =
        |at: &chrono::DateTime<chrono::Utc>| at.to_rfc3339_opts(SecondsFormat::Millis, true);

    let header = vec![
        vec!["Inventory Management System Report".to_string()],
        vec!["Generated".to_string(), stamp(&report.generated_at)],
        vec![
            "Period".to_string(),
            stamp(&report.period.start),
            stamp(&report.period.end),
        ],
    ];

    let inv = &report.inventory;
    let summary = vec![
        vec!["INVENTORY SUMMARY".to_string()],
        vec!["total_items".to_string(), inv.total_items.to_string()],
        vec!["total_value".to_string(), inv.total_value.to_string()],
        vec![
            "low_stock_items".to_string(),
            inv.low_stock_items.to_string(),
        ],
        vec![
            "out_of_stock_items".to_string(),
            inv.out_of_stock_items.to_string(),
        ],
        vec!["avg_price".to_string(), format!("{:.2}", inv.avg_price)],
        vec![
            "avg_quantity".to_string(),
            format!("{:.2}", inv.avg_quantity),
        ],
    ];

    let mut categories = vec![
        vec!["CATEGORY BREAKDOWN".to_string()],
        vec![
            "Category".to_string(),
            "Items".to_string(),
            "Total Value".to_string(),
            "Average Price".to_string(),
        ],
    ];
    for c in &report.categories {
        categories.push(vec![
            c.category.clone(),
            c.item_count.to_string(),
            format!("{:.2}", c.total_value),
            format!("{:.2}", c.avg_price),
        ]);
    }

    let mut suppliers = vec![
        vec!["SUPPLIER PERFORMANCE".to_string()],
        vec![
            "Supplier".to_string(),
            "Items".to_string(),
            "Total Value".to_string(),
        ],
    ];
    for s in &report.suppliers {
        suppliers.push(vec![
            s.name.clone(),
            s.item_count.to_string(),
            format!("{:.2}", s.total_value),
        ]);
    }

    csv_sections(&[header, summary, categories, suppliers])
}

fn report_pdf(report: &ReportData) -> Vec<u8> {
    let mut doc = pdf::PdfBuilder::new();
    doc.title("Inventory Management System Report");
    doc.text(&format!(
        "Generated: {}",
        report
            .generated_at
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    ));
    doc.text(&format!(
        "Period: {} to {}",
        report.period.start.format("%Y-%m-%d"),
        report.period.end.format("%Y-%m-%d")
    ));
    doc.gap();

    let inv = &report.inventory;
    doc.heading("Inventory Summary");
    doc.text(&format!("total_items: {}", inv.total_items));
    doc.text(&format!("total_value: {}", inv.total_value));
    doc.text(&format!("low_stock_items: {}", inv.low_stock_items));
    doc.text(&format!("out_of_stock_items: {}", inv.out_of_stock_items));
    doc.text(&format!("avg_price: {:.2}", inv.avg_price));
    doc.text(&format!("avg_quantity: {:.2}", inv.avg_quantity));
    doc.gap();

    doc.heading("Category Breakdown");
    for c in &report.categories {
        doc.text(&format!(
            "{}  Items: {}  Total: ${:.2}",
            c.category, c.item_count, c.total_value
        ));
    }
    doc.gap();

    doc.heading("Top Suppliers");
    for s in &report.suppliers {
        doc.text(&format!(
            "{}  Items: {}  Value: ${:.2}",
            s.name, s.item_count, s.total_value
        ));
    }
    doc.gap();

    doc.heading("Users by Role");
    for u in &report.users {
        doc.text(&format!(
            "{}  Count: {}  Active: {}",
            u.role, u.count, u.active_count
        ));
    }
    doc.gap();

    doc.heading("Alerts (period)");
    for a in &report.alerts {
        doc.text(&format!(
            "{}  Count: {}  Resolved: {}",
            a.alert_type, a.count, a.resolved
        ));
    }

    doc.build()
}
