// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::db::{KeyValueStore, KeyValueStoreExt};

pub fn write_bin<DB>(db: &DB)
where
    DB: KeyValueStore,
{
    let key = b"1";
    let value = [1];
    db.write_bin(key, &value).unwrap();
}

pub fn read_bin<DB>(db: &DB)
where
    DB: KeyValueStore,
{
    let key = b"0";
    let value = [1];
    db.write_bin(key, &value).unwrap();
    let res = db.read_bin(key).unwrap().unwrap();
    assert_eq!(value.as_ref(), res.as_slice());
}

pub fn write_read_obj<DB>(db: &DB)
where
    DB: KeyValueStore,
{
    let key = b"ethereum-config-Cthulhu";
    let value = 42;
    db.write_obj(key, &value).unwrap();
    let res: i32 = db.read_obj(key).unwrap().unwrap();
    assert_eq!(value, res);

    // chain rows must stay overwritable, unlike content-addressed rows.
    let value = 1337;
    db.write_obj(key, &value).unwrap();
    let res: i32 = db.read_obj(key).unwrap().unwrap();
    assert_eq!(value, res);
}

pub fn exists<DB>(db: &DB)
where
    DB: KeyValueStore,
{
    let key = b"0";
    let value = [1];
    db.write_bin(key, &value).unwrap();
    let res = db.exists(key).unwrap();
    assert!(res);
}

pub fn does_not_exist<DB>(db: &DB)
where
    DB: KeyValueStore,
{
    let key = b"Azathoth";

    assert!(!db.exists(key).unwrap());
    assert!(db.read_obj::<i32>(key).unwrap().is_none());
}

pub fn bulk_write<DB>(db: &DB)
where
    DB: KeyValueStore,
{
    let values: Vec<(Vec<u8>, Vec<u8>)> = (0u8..32).map(|i| (vec![i; 32], vec![i])).collect();
    db.write_batch(values.clone()).unwrap();
    for (key, value) in values {
        assert_eq!(db.read_bin(&key).unwrap(), Some(value));
    }
}
