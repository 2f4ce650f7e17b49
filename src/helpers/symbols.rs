use crate::types::SymbolInfo;

/// Symbols of `submarket`, catalog order kept. With `open_only`, only
/// symbols whose exchange is currently open.
pub fn by_submarket<'a>(
    symbols: &'a [SymbolInfo],
    submarket: &'a str,
    open_only: bool,
) -> impl Iterator<Item = &'a SymbolInfo> + 'a {
    symbols
        .iter()
        .filter(move |s| s.submarket == submarket)
        .filter(move |s| !open_only || s.exchange_is_open)
}

/// (symbol, display name) pairs for the picker.
pub fn picker_list(symbols: &[SymbolInfo], submarket: &str) -> Vec<(String, String)> {
    by_submarket(symbols, submarket, false)
        .map(|s| (s.symbol.clone(), s.display_name.clone()))
        .collect()
}

pub fn first_open(symbols: &[SymbolInfo], submarket: &str) -> Option<String> {
    by_submarket(symbols, submarket, true)
        .next()
        .map(|s| s.symbol.clone())
}

pub fn display_name(symbols: &[SymbolInfo], symbol: &str) -> Option<String> {
    symbols
        .iter()
        .find(|s| s.symbol == symbol)
        .map(|s| s.display_name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(symbol: &str, name: &str, submarket: &str, open: bool) -> SymbolInfo {
        SymbolInfo {
            symbol: symbol.into(),
            display_name: name.into(),
            market: "forex".into(),
            submarket: submarket.into(),
            exchange_is_open: open,
        }
    }

    #[test]
    fn first_open_skips_closed_and_other_submarkets() {
        let catalog = vec![
            sym("frxAUDCAD", "AUD/CAD", "minor_pairs", true),
            sym("frxEURUSD", "EUR/USD", "major_pairs", false),
            sym("frxUSDJPY", "USD/JPY", "major_pairs", true),
        ];

        assert_eq!(first_open(&catalog, "major_pairs").as_deref(), Some("frxUSDJPY"));
        assert_eq!(
            picker_list(&catalog, "major_pairs"),
            vec![
                ("frxEURUSD".to_string(), "EUR/USD".to_string()),
                ("frxUSDJPY".to_string(), "USD/JPY".to_string()),
            ]
        );
        assert_eq!(display_name(&catalog, "frxAUDCAD").as_deref(), Some("AUD/CAD"));
        assert_eq!(display_name(&catalog, "R_100"), None);
    }

    #[test]
    fn nothing_open() {
        let catalog = vec![sym("frxEURUSD", "EUR/USD", "major_pairs", false)];
        assert_eq!(first_open(&catalog, "major_pairs"), None);
    }
}
