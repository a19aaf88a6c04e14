/*!
 * Volume Decoders
 * Store-volume decoders available without external libraries
 */

mod store_table;

pub use store_table::{StoreTableBuilder, StoreTableDecoder, STORE_TABLE_MAGIC, STORE_TABLE_VERSION};
