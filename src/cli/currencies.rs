use super::ui;
use crate::core::metadata::CurrencyTable;
use crate::core::picker::{CurrencyPicker, Side};
use crate::core::prefs::Theme;
use crate::core::CurrencyCode;

/// Prints every supported currency, marking the ones in `selected`.
pub fn run(table: &CurrencyTable, selected: &[CurrencyCode], theme: Theme) {
    println!(
        "\n{}",
        ui::style_text("Dostępne waluty", ui::StyleType::Title)
    );
    // A picker gives the same ordering as the dropdowns.
    let picker = CurrencyPicker::build(Side::From, table.entries(), CurrencyCode::USD);
    let options = picker.options().map(|mut option| {
        option.selected = selected.contains(&option.info.code);
        option
    });
    println!("{}", ui::currency_table(options, theme));
}
