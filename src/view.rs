//! HTML views
//!
//! Renders the brand list and the edit form. Every substituted value is
//! HTML-escaped; nothing is computed beyond what the store returned.

use std::fmt::Write;

use crate::model::Brand;

/// Escape text for use in HTML element content and quoted attributes
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <link rel="stylesheet" href="/style.css">
</head>
<body>
    <main class="container">
{body}
    </main>
</body>
</html>
"#,
        title = escape_html(title),
    )
}

/// Brand list page with the add form
pub fn render_list(brands: &[Brand]) -> String {
    let mut rows = String::new();
    for brand in brands {
        let id = urlencoding::encode(brand.id.as_str());
        // Writing to a String cannot fail
        let _ = write!(
            rows,
            r#"            <tr data-id="{id_attr}">
                <td>{name}</td>
                <td>{description}</td>
                <td class="actions">
                    <a href="/edit/{id}">Edit</a>
                    <form action="/delete/{id}" method="POST" class="inline">
                        <button type="submit">Delete</button>
                    </form>
                </td>
            </tr>
"#,
            id_attr = escape_html(brand.id.as_str()),
            name = escape_html(&brand.name),
            description = escape_html(&brand.description),
        );
    }

    let table = if brands.is_empty() {
        "        <p class=\"empty\">No brands yet.</p>\n".to_string()
    } else {
        format!(
            r#"        <table>
            <thead>
                <tr><th>Name</th><th>Description</th><th></th></tr>
            </thead>
            <tbody>
{rows}            </tbody>
        </table>
"#
        )
    };

    let body = format!(
        r#"        <h1>Brands</h1>
        <form action="/add" method="POST" class="brand-form">
            <input type="text" name="name" placeholder="Brand name">
            <input type="text" name="description" placeholder="Description">
            <button type="submit">Add brand</button>
        </form>
{table}"#
    );

    layout("Brands", &body)
}

/// Edit form for a single brand
pub fn render_edit(brand: &Brand) -> String {
    let body = format!(
        r#"        <h1>Edit brand</h1>
        <form action="/edit/{id}" method="POST" class="brand-form">
            <label>Name
                <input type="text" name="name" value="{name}">
            </label>
            <label>Description
                <input type="text" name="description" value="{description}">
            </label>
            <button type="submit">Save</button>
            <a href="/">Cancel</a>
        </form>
"#,
        id = urlencoding::encode(brand.id.as_str()),
        name = escape_html(&brand.name),
        description = escape_html(&brand.description),
    );

    layout(&format!("Edit {}", brand.name), &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BrandId;

    fn brand(id: &str, name: &str, description: &str) -> Brand {
        Brand {
            id: BrandId::new(id),
            name: name.to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom & Jerry's"</b>"#),
            "&lt;b&gt;&quot;Tom &amp; Jerry&#39;s&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_list_renders_each_brand() {
        let html = render_list(&[
            brand("aaa", "Acme", "Widgets"),
            brand("bbb", "Globex", "<script>"),
        ]);
        assert!(html.contains("<td>Acme</td>"));
        assert!(html.contains("<td>Widgets</td>"));
        assert!(html.contains("<td>&lt;script&gt;</td>"));
        assert!(html.contains(r#"href="/edit/aaa""#));
        assert!(html.contains(r#"action="/delete/bbb""#));
        assert!(!html.contains("No brands yet."));
    }

    #[test]
    fn test_empty_list() {
        let html = render_list(&[]);
        assert!(html.contains("No brands yet."));
        assert!(html.contains(r#"action="/add""#));
    }

    #[test]
    fn test_edit_prefills_fields() {
        let html = render_edit(&brand("abc", "Acme \"Co\"", "Widgets"));
        assert!(html.contains(r#"action="/edit/abc""#));
        assert!(html.contains(r#"value="Acme &quot;Co&quot;""#));
        assert!(html.contains(r#"value="Widgets""#));
    }
}
