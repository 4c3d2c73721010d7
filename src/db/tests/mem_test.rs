// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::subtests;
use crate::db::MemoryDB;

#[test]
fn db_write() {
    let db = MemoryDB::default();
    subtests::write_bin(&db);
}

#[test]
fn db_read() {
    let db = MemoryDB::default();
    subtests::read_bin(&db);
}

#[test]
fn db_read_write_obj() {
    let db = MemoryDB::default();
    subtests::write_read_obj(&db);
}

#[test]
fn db_exists() {
    let db = MemoryDB::default();
    subtests::exists(&db);
}

#[test]
fn db_does_not_exist() {
    let db = MemoryDB::default();
    subtests::does_not_exist(&db);
}

#[test]
fn db_bulk_write() {
    let db = MemoryDB::default();
    subtests::bulk_write(&db);
}
