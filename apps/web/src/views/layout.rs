//! Page shell shared by every view.

use axum::http::StatusCode;

use super::escape;

/// Wraps `body` in the HTML document shell.
pub fn page(store_name: &str, title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="id">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title} · {store}</title>
    <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="bg-gray-100">
    <nav class="bg-white shadow mb-6">
        <div class="container mx-auto px-4 py-3 flex gap-6 items-center">
            <span class="font-bold">{store}</span>
            <a href="/sales" class="text-blue-600 hover:underline">Sales</a>
            <a href="/sales/create" class="text-blue-600 hover:underline">New sale</a>
        </div>
    </nav>
{body}
</body>
</html>
"#,
        title = escape(title),
        store = escape(store_name),
        body = body,
    )
}

/// A bare error page, used when the normal page cannot be built.
pub fn error_page(status: StatusCode, message: &str) -> String {
    let body = format!(
        r#"    <div class="container mx-auto px-4 py-8">
        <h1 class="text-2xl font-bold mb-4">{code}</h1>
        <div class="bg-red-100 border border-red-400 text-red-700 px-4 py-3 rounded">{message}</div>
    </div>"#,
        code = escape(&status.to_string()),
        message = escape(message),
    );
    page("Kasir POS", "Error", &body)
}
