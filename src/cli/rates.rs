use super::ui::{self, StyleType};
use crate::core::envelope::QueryResult;
use crate::core::quote::Quote;
use anyhow::Result;
use comfy_table::{Cell, Table};

fn build_table(quotes: &[Quote], with_meta: bool) -> Table {
    let mut table = ui::new_styled_table();
    let mut header = vec![
        ui::header_cell("Date"),
        ui::header_cell("Base"),
        ui::header_cell("Currency"),
        ui::header_cell("Rate"),
    ];
    if with_meta {
        header.push(ui::header_cell("Source"));
    }
    table.set_header(header);

    for quote in quotes {
        let mut row = vec![
            ui::format_optional_cell(quote.date.clone(), |d| d),
            Cell::new(&quote.base_currency),
            Cell::new(&quote.quote_currency),
            ui::rate_cell(quote.quote),
        ];
        if with_meta {
            let source = quote
                .meta
                .as_ref()
                .and_then(|meta| meta.source_short_names.clone());
            row.push(ui::format_optional_cell(source, |s| s));
        }
        table.add_row(row);
    }
    table
}

/// Prints a table of quotes, or the raw response when the query failed.
pub fn display_rates(title: &str, result: &QueryResult, with_meta: bool) -> Result<()> {
    println!("\n{}", ui::style_text(title, StyleType::Title));

    if let Some(error) = &result.error {
        println!(
            "{}",
            ui::style_text("The service returned no rates for this query", StyleType::Error)
        );
        println!("{}", serde_json::to_string_pretty(&error.data)?);
        return Ok(());
    }

    let quotes: Vec<Quote> = result.decode()?.unwrap_or_default();
    println!("{}", build_table(&quotes, with_meta));
    println!("{}", ui::provenance_line(result.from_cache, result.timestamp));
    Ok(())
}
