pub mod csv;
pub mod db_utils;
