//! # Sale Entry Form
//!
//! `GET /sales/create`, and the re-rendered form after a failed submit.
//!
//! ## Item Rows
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  #items-container                                                       │
//! │  ┌───────────────────────────────┬──────┬────────┐                     │
//! │  │ items[0][product_id] <select> │ qty  │ Remove │                     │
//! │  ├───────────────────────────────┼──────┼────────┤                     │
//! │  │ items[1][product_id] <select> │ qty  │ Remove │                     │
//! │  └───────────────────────────────┴──────┴────────┘                     │
//! │  [Add item] clones #item-row-template with the next free index.        │
//! │  Removing a row leaves a gap in the indices; the server accepts it.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use kasir_core::{Customer, PaymentMethod, Product};

use super::{escape, layout};
use crate::config::AppConfig;
use crate::form::{SaleForm, SubmittedRow};

/// Placeholder swapped for the row index by the add-row script.
const INDEX_PLACEHOLDER: &str = "__INDEX__";

/// Everything the form page needs.
pub struct SaleFormPage<'a> {
    pub config: &'a AppConfig,
    pub products: &'a [Product],
    pub customers: &'a [Customer],
    /// Shown above the form after a failed submit.
    pub error: Option<&'a str>,
    /// The rejected submission, to refill the form with.
    pub submitted: Option<&'a SaleForm>,
}

/// Renders the complete form page.
pub fn render(page: &SaleFormPage<'_>) -> String {
    let empty_row = [SubmittedRow::default()];
    let rows: &[SubmittedRow] = match page.submitted {
        Some(form) if !form.rows.is_empty() => &form.rows,
        _ => &empty_row,
    };
    let selected_customer = page.submitted.map(|f| f.customer_id.trim()).unwrap_or("");
    let selected_method = page
        .submitted
        .and_then(|f| f.payment_method.parse::<PaymentMethod>().ok())
        .unwrap_or_default();

    let error = page
        .error
        .map(|message| {
            format!(
                r#"        <div class="bg-red-100 border border-red-400 text-red-700 px-4 py-3 rounded mb-4" role="alert">{}</div>
"#,
                escape(message)
            )
        })
        .unwrap_or_default();

    let item_rows: String = rows
        .iter()
        .enumerate()
        .map(|(index, row)| item_row(page, &index.to_string(), row))
        .collect();

    let template_row = item_row(page, INDEX_PLACEHOLDER, &SubmittedRow::default());

    let body = format!(
        r#"    <div class="container mx-auto px-4 py-8">
        <h1 class="text-2xl font-bold mb-6">New Sale</h1>
{error}
        <form method="POST" action="/sales/create" class="bg-white p-6 rounded shadow-md">
            <div class="mb-4">
                <label class="block text-gray-700 mb-2" for="customer_id">Customer</label>
                <select id="customer_id" name="customer_id" class="w-full p-2 border rounded">
                    <option value="">Walk-in customer</option>
{customers}                </select>
            </div>

            <div class="mb-4">
                <label class="block text-gray-700 mb-2" for="payment_method">Payment method</label>
                <select id="payment_method" name="payment_method" class="w-full p-2 border rounded" required>
{methods}                </select>
            </div>

            <div class="mb-6">
                <div class="flex justify-between items-center mb-4">
                    <h3 class="text-lg font-semibold">Items</h3>
                    <button type="button" onclick="addItemRow()"
                        class="bg-blue-500 text-white px-4 py-2 rounded hover:bg-blue-600">Add item</button>
                </div>
                <div id="items-container">
{item_rows}                </div>
            </div>

            <button type="submit" class="bg-green-500 text-white px-6 py-2 rounded hover:bg-green-600">Save sale</button>
        </form>
    </div>

    <template id="item-row-template">
{template_row}    </template>

    <script>
        let nextItemIndex = {next_index};

        function addItemRow() {{
            const template = document.getElementById('item-row-template').innerHTML;
            const row = template.split('{placeholder}').join(String(nextItemIndex++));
            document.getElementById('items-container').insertAdjacentHTML('beforeend', row);
        }}
    </script>"#,
        error = error,
        customers = customer_options(page.customers, selected_customer),
        methods = payment_method_options(selected_method),
        item_rows = item_rows,
        template_row = template_row,
        next_index = rows.len(),
        placeholder = INDEX_PLACEHOLDER,
    );

    layout::page(&page.config.store_name, "New Sale", &body)
}

fn customer_options(customers: &[Customer], selected: &str) -> String {
    customers
        .iter()
        .map(|c| {
            format!(
                "                    <option value=\"{}\"{}>{}</option>\n",
                escape(&c.id),
                selected_attr(c.id == selected),
                escape(&c.name)
            )
        })
        .collect()
}

fn payment_method_options(selected: PaymentMethod) -> String {
    PaymentMethod::ALL
        .iter()
        .map(|m| {
            format!(
                "                    <option value=\"{0}\"{1}>{0}</option>\n",
                m.as_str(),
                selected_attr(*m == selected)
            )
        })
        .collect()
}

fn item_row(page: &SaleFormPage<'_>, index: &str, row: &SubmittedRow) -> String {
    let selected = row.product_id.trim();
    let options: String = page
        .products
        .iter()
        .map(|p| {
            format!(
                "                            <option value=\"{}\"{}>{} · {} (Stock: {})</option>\n",
                escape(&p.id),
                selected_attr(p.id == selected),
                escape(&p.name),
                escape(&page.config.format_currency(p.sale_price())),
                p.stock
            )
        })
        .collect();

    format!(
        r#"                    <div class="item-row flex gap-4 mb-4">
                        <select name="items[{index}][product_id]" required class="flex-1 p-2 border rounded">
                            <option value="">Choose product</option>
{options}                        </select>
                        <input type="number" name="items[{index}][quantity]" min="1" value="{quantity}"
                            class="w-24 p-2 border rounded" placeholder="Qty" required>
                        <button type="button" onclick="this.parentElement.remove()"
                            class="bg-red-500 text-white px-3 py-2 rounded hover:bg-red-600">Remove</button>
                    </div>
"#,
        index = index,
        options = options,
        quantity = escape(row.quantity.trim()),
    )
}

fn selected_attr(selected: bool) -> &'static str {
    if selected {
        " selected"
    } else {
        ""
    }
}
