mod test_empty_records_dropped_on_restore;
mod test_failed_write_is_not_observed;
mod test_file_store_restart;
mod test_rooms_survive_restart;
