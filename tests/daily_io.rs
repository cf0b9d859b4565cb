/*!
Test daily close IO
*/
use chrono::NaiveDate;
use closecast::data::{daily::*, fake::*};
use rand::{rngs::StdRng, SeedableRng};
use rand_distr::Normal;
use std::io::{Seek, SeekFrom};
use tempfile::tempfile;

#[test]
fn fake_data_roundtrip() {
    const TEST_DATA_LENGTH: usize = 1000;
    let mut walk = PriceRandomWalk {
        rng: StdRng::seed_from_u64(3),
        price: 40.0,
        returns: Normal::new(0.0, 0.01).unwrap(),
    };
    let start = NaiveDate::from_ymd_opt(2015, 6, 1).unwrap();
    let series = fake_series(&mut walk, start, TEST_DATA_LENGTH).expect("Generating test data should not fail!");
    let mut tmp = tempfile().expect("Tempfile creation should not fail!");
    let written = write_series(&mut tmp, &series).expect("Writing test data should not fail!");
    assert_eq!(written, TEST_DATA_LENGTH);
    tmp.seek(SeekFrom::Start(0)).expect("Seek should not fail");
    let read = read_series(&mut tmp).expect("Reading test data should not fail");
    assert_eq!(series, read);
    assert_eq!(series.fingerprint(), read.fingerprint());
}
