use super::ui::{self, StyleType};
use crate::core::envelope::QueryResult;
use crate::core::quote::CurrencyInfo;
use anyhow::Result;
use comfy_table::{Cell, Table};

fn build_table(currencies: &[CurrencyInfo]) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Code"),
        ui::header_cell("Name"),
        ui::header_cell("Numeric"),
        ui::header_cell("Digits"),
        ui::header_cell("Active"),
    ]);

    for currency in currencies {
        table.add_row(vec![
            Cell::new(&currency.code),
            Cell::new(&currency.name),
            ui::format_optional_cell(currency.numeric_code.clone(), |c| c),
            ui::format_optional_cell(currency.decimal_digits, |d| d.to_string()),
            ui::format_optional_cell(currency.active, |active| {
                (if active { "yes" } else { "no" }).to_string()
            }),
        ]);
    }
    table
}

pub fn display_currencies(result: &QueryResult) -> Result<()> {
    println!("\n{}", ui::style_text("Currencies", StyleType::Title));

    if let Some(error) = &result.error {
        println!(
            "{}",
            ui::style_text("The service returned no currencies", StyleType::Error)
        );
        println!("{}", serde_json::to_string_pretty(&error.data)?);
        return Ok(());
    }

    let currencies: Vec<CurrencyInfo> = result.decode()?.unwrap_or_default();
    println!("{}", build_table(&currencies));
    println!("{}", ui::provenance_line(result.from_cache, result.timestamp));
    Ok(())
}
