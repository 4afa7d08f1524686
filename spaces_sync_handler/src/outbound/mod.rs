pub mod mysql_record_repo;
pub mod s3_storage;
