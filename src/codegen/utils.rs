//! Utility functions for script generation.

use convert_case::{Case, Casing};

/// Convert a string to snake_case
pub fn to_snake_case(s: &str) -> String {
    s.to_case(Case::Snake)
}

/// Format a name for display in trace messages (Title Case with spaces)
pub fn to_display_name(s: &str) -> String {
    s.to_case(Case::Title)
}

/// Escape single quotes for embedding in QVS string literals.
///
/// The platform has no in-literal escape; quotes are spliced back in through
/// a Chr() expansion.
pub fn escape_qvs_string(s: &str) -> String {
    s.replace('\'', "$(=Chr39())")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_conversions() {
        assert_eq!(to_snake_case("SalesOrder"), "sales_order");
        assert_eq!(to_display_name("sales_order"), "Sales Order");
        assert_eq!(to_display_name("salesOrderDetail"), "Sales Order Detail");
    }

    #[test]
    fn test_escape_qvs_string() {
        assert_eq!(
            escape_qvs_string("order's header"),
            "order$(=Chr39())s header"
        );
        assert_eq!(escape_qvs_string("plain"), "plain");
    }
}
