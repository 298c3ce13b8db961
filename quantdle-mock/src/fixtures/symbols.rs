use chrono::NaiveDate;
use quantdle_core::SymbolInfo;

pub struct FixtureSymbol {
    pub symbol: &'static str,
    pub from: (i32, u32, u32),
    pub to: (i32, u32, u32),
    pub base_price: f64,
    /// Plan does not include this symbol (service answers 403).
    pub restricted: bool,
    /// Every other archive is corrupt.
    pub flaky: bool,
}

impl FixtureSymbol {
    pub fn available_from(&self) -> NaiveDate {
        ymd(self.from)
    }

    pub fn available_to(&self) -> NaiveDate {
        ymd(self.to)
    }

    pub fn info(&self) -> SymbolInfo {
        SymbolInfo {
            symbol: self.symbol.to_string(),
            available_from: self.available_from(),
            available_to: self.available_to(),
        }
    }
}

fn ymd((y, m, d): (i32, u32, u32)) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

pub const SYMBOLS: &[FixtureSymbol] = &[
    FixtureSymbol {
        symbol: "EURUSD",
        from: (2010, 1, 1),
        to: (2024, 12, 31),
        base_price: 1.10,
        restricted: false,
        flaky: false,
    },
    FixtureSymbol {
        symbol: "GBPUSD",
        from: (2012, 1, 1),
        to: (2024, 12, 31),
        base_price: 1.30,
        restricted: false,
        flaky: false,
    },
    FixtureSymbol {
        symbol: "XAUUSD",
        from: (2015, 1, 1),
        to: (2024, 12, 31),
        base_price: 1800.0,
        restricted: false,
        flaky: false,
    },
    FixtureSymbol {
        symbol: "US500",
        from: (2015, 1, 1),
        to: (2024, 12, 31),
        base_price: 4000.0,
        restricted: true,
        flaky: false,
    },
    FixtureSymbol {
        symbol: "FLAKY",
        from: (2020, 1, 1),
        to: (2024, 12, 31),
        base_price: 10.0,
        restricted: false,
        flaky: true,
    },
];

pub fn by_symbol(s: &str) -> Option<&'static FixtureSymbol> {
    SYMBOLS.iter().find(|f| f.symbol.eq_ignore_ascii_case(s))
}
