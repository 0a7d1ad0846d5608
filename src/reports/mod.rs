//! Static HTML rendering of the monthly report.

use crate::ledger::{MonthlyReport, SegmentSummary};
use rust_decimal::Decimal;
use std::fmt::Write;

/// Labels printed on the rendered document.
#[derive(Debug, Clone)]
pub struct ReportBranding {
    pub company_name: String,
    pub currency_symbol: String,
}

impl ReportBranding {
    pub fn new(company_name: impl Into<String>, currency_symbol: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            currency_symbol: currency_symbol.into(),
        }
    }

    fn money(&self, amount: Decimal) -> String {
        format!("{}{:.2}", escape(&self.currency_symbol), amount.round_dp(2))
    }
}

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const STYLE: &str = "body{font-family:sans-serif;margin:2em;color:#222}\
table{border-collapse:collapse;width:100%;margin-bottom:1.5em}\
th,td{border:1px solid #ccc;padding:4px 8px;text-align:left}\
td.num,th.num{text-align:right}\
tfoot td{font-weight:bold}\
.profit{font-size:1.2em}";

/// Renders a self-contained HTML page for the report.
pub fn render_monthly_html(report: &MonthlyReport, branding: &ReportBranding) -> String {
    let mut html = String::with_capacity(4096);
    let title = format!("{} {}", report.month, report.year);
    let company = escape(&branding.company_name);

    // Writing into a String cannot fail.
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{company}: Monthly Report {title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <h1>{company}</h1>\n<h2>Monthly Report: {title}</h2>\n",
        company = company,
        title = escape(&title),
        STYLE = STYLE,
    );

    segment_table(&mut html, "Own Trucks", &report.own, branding);
    segment_table(&mut html, "Market Trucks", &report.market, branding);

    let _ = write!(
        html,
        "<h3>Expenses</h3>\n<table>\n\
         <tr><th>Trip expenses (charged to market trucks)</th><td class=\"num\">{}</td></tr>\n\
         <tr><th>Office expenses (charged to own trucks)</th><td class=\"num\">{}</td></tr>\n\
         </table>\n",
        branding.money(report.expenses.total_expense),
        branding.money(report.expenses.total_office_expense),
    );

    let _ = write!(
        html,
        "<h3>Profit</h3>\n<table class=\"profit\">\n\
         <tr><th>Own trucks</th><td class=\"num\">{}</td></tr>\n\
         <tr><th>Market trucks</th><td class=\"num\">{}</td></tr>\n\
         <tr><th>Total</th><td class=\"num\">{}</td></tr>\n\
         </table>\n</body>\n</html>\n",
        branding.money(report.own_profit),
        branding.money(report.market_profit),
        branding.money(report.total_profit),
    );

    html
}

fn segment_table(html: &mut String, heading: &str, segment: &SegmentSummary, branding: &ReportBranding) {
    let _ = write!(
        html,
        "<h3>{} ({} trips)</h3>\n<table>\n<thead><tr>\
         <th>Trip</th><th>Date</th><th>Truck</th><th>Party</th><th>Route</th>\
         <th class=\"num\">Freight</th><th class=\"num\">Charges</th><th class=\"num\">Deductions</th>\
         </tr></thead>\n<tbody>\n",
        escape(heading),
        segment.trip_count,
    );

    if segment.trips.is_empty() {
        html.push_str("<tr><td colspan=\"8\">No trips</td></tr>\n");
    }
    for trip in &segment.trips {
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
             <td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td></tr>\n",
            escape(&trip.trip_id),
            trip.start_date.format("%d %b %Y"),
            escape(trip.truck_no.as_deref().unwrap_or("-")),
            escape(trip.party_name.as_deref().unwrap_or("-")),
            escape(&trip.route),
            branding.money(trip.amount),
            branding.money(trip.charge_to_bill),
            branding.money(trip.charge_not_to_bill),
        );
    }

    let _ = write!(
        html,
        "</tbody>\n<tfoot><tr><td colspan=\"5\">Total</td>\
         <td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td></tr></tfoot>\n</table>\n",
        branding.money(segment.total_freight),
        branding.money(segment.total_charges),
        branding.money(segment.total_deductions),
    );
}
