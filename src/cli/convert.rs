use super::ui::{self, StyleType};
use crate::convert::Conversion;

fn format_conversion(conversion: &Conversion) -> String {
    format!(
        "{} {} = {} {}",
        conversion.amount,
        conversion.from,
        ui::style_text(&format!("{:.4}", conversion.result), StyleType::TotalValue),
        conversion.to
    )
}

pub fn display_conversion(conversion: &Conversion, from_cache: bool, timestamp: i64) {
    println!("\n{}", ui::style_text("Conversion", StyleType::Title));
    println!("{}", format_conversion(conversion));
    println!(
        "{} {:.6} ({}{})",
        ui::style_text("Rate:", StyleType::TotalLabel),
        conversion.rate,
        conversion.date.as_deref().unwrap_or("undated"),
        if conversion.historical { ", historical" } else { "" }
    );
    println!("{}", ui::provenance_line(from_cache, timestamp));
}
