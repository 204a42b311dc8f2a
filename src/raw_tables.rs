pub(crate) struct RawTable(pub &'static str);

pub(crate) static ATOMIC_NUMBERS: RawTable = RawTable(include_str!("raw_tables/sym_atomicnum.txt"));

pub(crate) static LODDERS03: RawTable =
    RawTable(include_str!("raw_tables/lodders03_solar_photosphere.txt"));

pub(crate) const ATOMIC_NUMBERS_FILE: &str = "sym_atomicnum.txt";

pub(crate) const LODDERS03_FILE: &str = "lodders03_solar_photosphere.txt";

/// Header lines preceding the data in solar abundance tables.
pub(crate) const SOLAR_HEADER_LINES: usize = 8;
