use crate::enrich::TokenRecord;
use comfy_table::{Cell, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

pub fn format_token_report(records: &[TokenRecord]) -> String {
    if records.is_empty() {
        return "No approvals found in the scanned window.".to_string();
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["Token", "Name"]);

    for record in records {
        table.add_row(vec![
            Cell::new(record.address.to_string()),
            Cell::new(&record.name),
        ]);
    }

    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn empty_report_says_so() {
        assert_eq!(
            format_token_report(&[]),
            "No approvals found in the scanned window."
        );
    }

    #[test]
    fn report_lists_checksummed_address_and_name() {
        let records = vec![TokenRecord {
            address: address!("dac17f958d2ee523a2206206994597c13d831ec7"),
            name: "Tether USD".to_string(),
        }];
        let output = format_token_report(&records);
        // EIP-55 checksummed form, not the lowercase input spelling.
        assert!(output.contains("0xdAC17F958D2ee523a2206206994597C13D831ec7"));
        assert!(output.contains("Tether USD"));
    }
}
