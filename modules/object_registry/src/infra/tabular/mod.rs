//! Spreadsheet containers for bulk transfer

pub mod csv_codec;
pub mod xlsx_codec;

pub use csv_codec::CsvCodec;
pub use xlsx_codec::XlsxCodec;

use crate::config::TabularFormat;
use crate::domain::tabular::{CodecSet, TabularCodec};
use std::sync::Arc;

/// Export in `format`; import sniffs XLSX first and falls back to CSV
pub fn codec_set(format: TabularFormat) -> CodecSet {
    let xlsx: Arc<dyn TabularCodec> = Arc::new(XlsxCodec);
    let csv: Arc<dyn TabularCodec> = Arc::new(CsvCodec);

    let export = match format {
        TabularFormat::Xlsx => xlsx.clone(),
        TabularFormat::Csv => csv.clone(),
    };

    CodecSet::new(export, vec![xlsx, csv])
}
