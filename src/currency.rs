/// A row of the central bank's daily currency table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyDefinition {
    /// Internal bank identifier, e.g. `R01235`.
    pub id: &'static str,
    /// ISO 4217 numeric code, zero padded.
    pub numeric_code: &'static str,
    /// ISO 4217 alphabetic code.
    pub char_code: &'static str,
    /// Lot size the rate is quoted for.
    pub nominal: u32,
    pub name: &'static str,
}

const fn currency(
    id: &'static str,
    numeric_code: &'static str,
    char_code: &'static str,
    nominal: u32,
    name: &'static str,
) -> CurrencyDefinition {
    CurrencyDefinition {
        id,
        numeric_code,
        char_code,
        nominal,
        name,
    }
}

/// Currencies published in the daily document, in output order.
pub static CURRENCIES: [CurrencyDefinition; 34] = [
    currency("R01010", "036", "AUD", 1, "Australian dollar"),
    currency("R01020A", "944", "AZN", 1, "Azerbaijani manat"),
    currency("R01035", "826", "GBP", 1, "British pound sterling"),
    currency("R01060", "051", "AMD", 100, "Armenian dram"),
    currency("R01090B", "933", "BYN", 1, "Belarusian ruble"),
    currency("R01100", "975", "BGN", 1, "Bulgarian lev"),
    currency("R01115", "986", "BRL", 1, "Brazilian real"),
    currency("R01135", "348", "HUF", 100, "Hungarian forint"),
    currency("R01200", "344", "HKD", 10, "Hong Kong dollar"),
    currency("R01215", "208", "DKK", 10, "Danish krone"),
    currency("R01235", "840", "USD", 1, "US dollar"),
    currency("R01239", "978", "EUR", 1, "Euro"),
    currency("R01270", "356", "INR", 100, "Indian rupee"),
    currency("R01335", "398", "KZT", 100, "Kazakhstani tenge"),
    currency("R01350", "124", "CAD", 1, "Canadian dollar"),
    currency("R01370", "417", "KGS", 100, "Kyrgyzstani som"),
    currency("R01375", "156", "CNY", 10, "Chinese yuan"),
    currency("R01500", "498", "MDL", 10, "Moldovan leu"),
    currency("R01535", "578", "NOK", 10, "Norwegian krone"),
    currency("R01565", "985", "PLN", 1, "Polish zloty"),
    currency("R01585F", "946", "RON", 10, "Romanian leu"),
    currency("R01589", "960", "XDR", 1, "SDR (Special Drawing Rights)"),
    currency("R01625", "702", "SGD", 1, "Singapore dollar"),
    currency("R01670", "972", "TJS", 10, "Tajikistani somoni"),
    currency("R01700J", "949", "TRY", 10, "Turkish lira"),
    currency("R01710A", "934", "TMT", 1, "New Turkmenistan manat"),
    currency("R01717", "860", "UZS", 10000, "Uzbekistani som"),
    currency("R01720", "980", "UAH", 10, "Ukrainian hryvnia"),
    currency("R01760", "203", "CZK", 10, "Czech koruna"),
    currency("R01770", "752", "SEK", 10, "Swedish krona"),
    currency("R01775", "756", "CHF", 1, "Swiss franc"),
    currency("R01810", "710", "ZAR", 10, "South African rand"),
    currency("R01815", "410", "KRW", 1000, "South Korean won"),
    currency("R01820", "392", "JPY", 100, "Japanese yen"),
];

#[cfg(test)]
pub(crate) fn find_by_char_code(char_code: &str) -> Option<&'static CurrencyDefinition> {
    CURRENCIES.iter().find(|c| c.char_code == char_code)
}
