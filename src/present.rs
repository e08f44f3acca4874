// Console rendering for menus and fetched orders. Everything here is pure
// string building; the caller decides where the text goes.

use crate::models::{Order, Organization, RestaurantSection, TerminalGroup};
use std::fmt::Write as _;

/// Shown in place of any value the API left out.
pub const PLACEHOLDER: &str = "N/A";

fn or_na(value: Option<String>) -> String {
    value.unwrap_or_else(|| PLACEHOLDER.to_string())
}

fn field(order: &Order, path: &[&str]) -> String {
    or_na(order.text(path))
}

fn name_or_na(name: &Option<String>) -> &str {
    name.as_deref().unwrap_or(PLACEHOLDER)
}

/// Numbered organization menu: `N. name (ID: id)`.
pub fn organization_menu(orgs: &[Organization]) -> String {
    let mut out = String::from("\nAvailable organizations:\n");
    for (idx, org) in orgs.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {} (ID: {})",
            idx + 1,
            name_or_na(&org.name),
            name_or_na(&org.id)
        );
    }
    out
}

/// Numbered terminal group menu with the owning organization's name looked
/// up among the listed organizations.
pub fn terminal_group_menu(groups: &[TerminalGroup], orgs: &[Organization]) -> String {
    let mut out = String::from("\nAvailable terminal groups:\n");
    for (idx, group) in groups.iter().enumerate() {
        let org_name = group
            .organization_id
            .as_deref()
            .and_then(|id| orgs.iter().find(|o| o.id.as_deref() == Some(id)))
            .and_then(|o| o.name.as_deref())
            .unwrap_or("Unknown");
        let _ = writeln!(
            out,
            "{}. {} (ID: {}) - Organization: {}",
            idx + 1,
            name_or_na(&group.name),
            group.id,
            org_name
        );
    }
    out
}

/// Section headers with their tables numbered continuously across sections.
/// Returns the text and the table ids in menu order; tables without an id
/// keep their slot so numbering stays aligned.
pub fn table_menu(sections: &[RestaurantSection]) -> (String, Vec<Option<String>>) {
    let mut out = String::from("\nAvailable restaurant sections and tables:\n");
    let mut ids = Vec::new();
    for section in sections {
        let _ = writeln!(
            out,
            "\nSection: {} (ID: {})",
            name_or_na(&section.name),
            name_or_na(&section.id)
        );
        for table in &section.tables {
            ids.push(table.id.clone());
            let number = table
                .number
                .map(|n| n.to_string())
                .unwrap_or_else(|| PLACEHOLDER.to_string());
            let _ = writeln!(
                out,
                "  {}. Table {}: {} (ID: {})",
                ids.len(),
                number,
                name_or_na(&table.name),
                name_or_na(&table.id)
            );
        }
    }
    (out, ids)
}

/// Pretty JSON of one order, printed as a sample of what the API returned.
pub fn order_sample(order: &Order) -> String {
    let json = serde_json::to_string_pretty(order.raw()).unwrap_or_else(|_| order.raw().to_string());
    format!("\nSample order:\n{json}\n")
}

/// Text block for the `position`-th (1-based) order.
pub fn order_block(position: usize, order: &Order) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\nOrder {position}:");
    let _ = writeln!(out, "  ID: {}", field(order, &["id"]));
    let _ = writeln!(out, "  External number: {}", field(order, &["externalNumber"]));
    let _ = writeln!(out, "  Organization ID: {}", field(order, &["organizationId"]));
    let _ = writeln!(out, "  Created: {}", field(order, &["order", "whenCreated"]));
    let _ = writeln!(out, "  Status: {}", field(order, &["order", "status"]));
    let _ = writeln!(
        out,
        "  Customer: {} {}",
        field(order, &["order", "customer", "name"]),
        field(order, &["order", "customer", "surname"])
    );
    let _ = writeln!(out, "  Phone: {}", field(order, &["order", "phone"]));
    let _ = writeln!(out, "  Sum: {}", field(order, &["order", "sum"]));
    let _ = writeln!(out, "  Tables: {}", order.table_ids().join(", "));
    let _ = writeln!(out, "  Tab name: {}", field(order, &["order", "tabName"]));
    let _ = writeln!(out, "  Comment: {}", field(order, &["order", "customer", "comment"]));
    out
}

/// Every fetched order, numbered from 1.
pub fn orders(orders: &[Order]) -> String {
    let mut out = String::from("\nOrders:\n");
    for (idx, order) in orders.iter().enumerate() {
        out.push_str(&order_block(idx + 1, order));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Table;
    use serde_json::json;

    #[test]
    fn order_without_customer_renders_placeholders() {
        let order = Order(json!({
            "id": "o1",
            "externalNumber": "42",
            "organizationId": "org1",
            "order": {"whenCreated": "2025-01-02 10:00:00.000", "status": "Closed", "sum": 99,
                      "tableIds": ["t1", "t2"], "tabName": "Window"}
        }));
        let text = order_block(1, &order);
        assert!(text.contains("  Customer: N/A N/A\n"));
        assert!(text.contains("  Comment: N/A\n"));
        assert!(text.contains("  Phone: N/A\n"));
        assert!(text.contains("  Sum: 99\n"));
        assert!(text.contains("  Tables: t1, t2\n"));
        assert!(text.starts_with("\nOrder 1:\n  ID: o1\n"));
    }

    #[test]
    fn order_without_nested_order_still_renders() {
        let text = order_block(3, &Order(json!({})));
        assert!(text.contains("  Status: N/A\n"));
        assert!(text.contains("  Tables: \n"));
    }

    #[test]
    fn orders_are_numbered_in_fetch_order() {
        let text = orders(&[Order(json!({"id": "a"})), Order(json!({"id": "b"}))]);
        assert!(text.starts_with("\nOrders:\n\nOrder 1:\n  ID: a\n"));
        assert!(text.contains("\nOrder 2:\n  ID: b\n"));
    }

    #[test]
    fn organization_menu_shows_placeholder_for_missing_id() {
        let orgs = vec![
            Organization { id: Some("o1".into()), name: Some("A".into()) },
            Organization { id: None, name: Some("no id".into()) },
        ];
        let menu = organization_menu(&orgs);
        assert!(menu.contains("1. A (ID: o1)\n2. no id (ID: N/A)\n"));
    }

    #[test]
    fn group_menu_resolves_organization_names() {
        let orgs = vec![Organization { id: Some("org1".into()), name: Some("Cafe A".into()) }];
        let groups = vec![
            TerminalGroup { id: "tg1".into(), name: Some("Hall".into()), organization_id: Some("org1".into()) },
            TerminalGroup { id: "tg2".into(), name: None, organization_id: Some("org7".into()) },
        ];
        let menu = terminal_group_menu(&groups, &orgs);
        assert!(menu.contains("1. Hall (ID: tg1) - Organization: Cafe A\n"));
        assert!(menu.contains("2. N/A (ID: tg2) - Organization: Unknown\n"));
    }

    #[test]
    fn table_menu_numbers_across_sections() {
        let table = |id: Option<&str>, number| Table { id: id.map(Into::into), number, name: None };
        let sections = vec![
            RestaurantSection {
                id: Some("s1".into()),
                name: Some("Main".into()),
                tables: vec![table(Some("t1"), Some(1)), table(None, Some(2))],
            },
            RestaurantSection { id: None, name: None, tables: vec![table(Some("t3"), None)] },
        ];
        let (menu, ids) = table_menu(&sections);
        assert_eq!(ids, [Some("t1".to_string()), None, Some("t3".to_string())]);
        assert!(menu.contains("\nSection: Main (ID: s1)\n  1. Table 1: N/A (ID: t1)\n  2. Table 2: N/A (ID: N/A)\n"));
        assert!(menu.contains("\nSection: N/A (ID: N/A)\n  3. Table N/A: N/A (ID: t3)\n"));
    }
}
