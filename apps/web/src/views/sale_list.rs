//! Recent sales listing (`GET /sales`).

use chrono::Local;
use kasir_db::SaleSummary;

use super::{escape, layout};
use crate::config::AppConfig;

/// Renders the listing page. `success` shows the "sale saved" banner.
pub fn render(config: &AppConfig, sales: &[SaleSummary], success: bool) -> String {
    let banner = if success {
        r#"        <div class="bg-green-100 border border-green-400 text-green-700 px-4 py-3 rounded mb-4" role="status">Sale saved.</div>
"#
    } else {
        ""
    };

    let rows: String = if sales.is_empty() {
        r#"                <tr><td colspan="7" class="p-4 text-center text-gray-500">No sales yet.</td></tr>
"#
        .to_string()
    } else {
        sales.iter().map(|sale| sale_row(config, sale)).collect()
    };

    let body = format!(
        r#"    <div class="container mx-auto px-4 py-8">
        <div class="flex justify-between items-center mb-6">
            <h1 class="text-2xl font-bold">Sales</h1>
            <a href="/sales/create" class="bg-green-500 text-white px-4 py-2 rounded hover:bg-green-600">New sale</a>
        </div>
{banner}
        <table class="w-full bg-white rounded shadow-md">
            <thead>
                <tr class="text-left border-b">
                    <th class="p-2">Invoice</th>
                    <th class="p-2">Date</th>
                    <th class="p-2">Customer</th>
                    <th class="p-2">Payment</th>
                    <th class="p-2 text-right">Items</th>
                    <th class="p-2 text-right">Total</th>
                    <th class="p-2 text-right">Profit</th>
                </tr>
            </thead>
            <tbody>
{rows}            </tbody>
        </table>
    </div>"#,
        banner = banner,
        rows = rows,
    );

    layout::page(&config.store_name, "Sales", &body)
}

fn sale_row(config: &AppConfig, sale: &SaleSummary) -> String {
    format!(
        r#"                <tr class="border-b">
                    <td class="p-2 font-mono">{invoice}</td>
                    <td class="p-2">{date}</td>
                    <td class="p-2">{customer}</td>
                    <td class="p-2">{method}</td>
                    <td class="p-2 text-right">{items}</td>
                    <td class="p-2 text-right">{total}</td>
                    <td class="p-2 text-right">{profit}</td>
                </tr>
"#,
        invoice = escape(&sale.invoice_number),
        date = sale.sale_date.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
        customer = escape(sale.customer_name.as_deref().unwrap_or("Walk-in")),
        method = sale.payment_method,
        items = sale.item_count,
        total = escape(&config.format_currency(sale.total_amount())),
        profit = escape(&config.format_currency(sale.total_profit())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use kasir_core::PaymentMethod;

    fn summary(invoice: &str, customer: Option<&str>) -> SaleSummary {
        SaleSummary {
            id: "s-1".to_string(),
            invoice_number: invoice.to_string(),
            customer_name: customer.map(str::to_string),
            total_amount_cents: 17_000,
            total_profit_cents: 3_000,
            payment_method: PaymentMethod::Qris,
            sale_date: Utc::now(),
            item_count: 2,
        }
    }

    #[test]
    fn test_empty_listing() {
        let html = render(&AppConfig::default(), &[], false);
        assert!(html.contains("No sales yet."));
        assert!(!html.contains("Sale saved."));
    }

    #[test]
    fn test_listing_rows_and_banner() {
        let sales = [
            summary("INV-202610-002", Some("Budi & Sons")),
            summary("INV-202610-001", None),
        ];
        let html = render(&AppConfig::default(), &sales, true);

        assert!(html.contains("Sale saved."));
        assert!(html.contains("INV-202610-002"));
        assert!(html.contains("Budi &amp; Sons"));
        assert!(html.contains("Walk-in"));
        assert!(html.contains("Rp17.000"));
        assert!(html.contains("QRIS"));
    }
}
