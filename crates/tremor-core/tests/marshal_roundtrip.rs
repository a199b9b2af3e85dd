//! Round-trip tests for the data-model types through the marshaling
//! contract's in-memory reference store.

use tremor_core::{
    CatalogParams, GenerationInfo, MarshalStore, Marshalable, Rupture, RUP_PARENT_SEED,
};

#[test]
fn rupture_round_trips() {
    let rup = Rupture {
        t_day: 12.75,
        rup_mag: 5.25,
        k_prod: 0.0625,
        rup_parent: 17,
        x_km: -3.5,
        y_km: 42.0,
    };
    let mut store = MarshalStore::new();
    rup.marshal(&mut store);
    let back = Rupture::unmarshal(&mut store).unwrap();
    assert_eq!(back, rup);
}

#[test]
fn seed_rupture_round_trips() {
    let rup = Rupture::seed(0.0, 6.0, 0.01, 0.0, 0.0);
    let mut store = MarshalStore::new();
    rup.marshal(&mut store);
    let back = Rupture::unmarshal(&mut store).unwrap();
    assert_eq!(back.rup_parent, RUP_PARENT_SEED);
    assert_eq!(back, rup);
}

#[test]
fn generation_info_round_trips() {
    let info = GenerationInfo::new(321, 2.5, 8.0);
    let mut store = MarshalStore::new();
    info.marshal(&mut store);
    let back = GenerationInfo::unmarshal(&mut store).unwrap();
    assert_eq!(back, info);
}

#[test]
fn catalog_params_round_trip_every_field() {
    let params = CatalogParams {
        a: -2.25,
        p: 1.08,
        c: 0.0625,
        b: 0.97,
        alpha: 0.93,
        mref: 2.95,
        msup: 9.45,
        tbegin: 1.5,
        tend: 366.5,
        teps: 1.0e-5,
        mag_min_sim: 2.45,
        mag_max_sim: 8.95,
        mag_min_lo: 1.45,
        mag_min_hi: 5.95,
        mag_max_lo: 8.95,
        mag_max_hi: 8.95,
        gen_size_target: 250,
        gen_count_max: 99,
    };
    params.validate().unwrap();
    let mut store = MarshalStore::new();
    params.marshal(&mut store);
    let back = CatalogParams::unmarshal(&mut store).unwrap();
    assert_eq!(back, params);
}

#[test]
fn multiple_types_share_one_store() {
    let rup = Rupture::seed(3.0, 7.0, 0.5, 1.0, 2.0);
    let info = GenerationInfo::new(1, 7.0, 7.0);
    let mut store = MarshalStore::new();
    rup.marshal(&mut store);
    info.marshal(&mut store);
    assert_eq!(Rupture::unmarshal(&mut store).unwrap(), rup);
    assert_eq!(GenerationInfo::unmarshal(&mut store).unwrap(), info);
}

mod properties {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn any_rupture_round_trips(
            t_day in -1.0e4..1.0e4_f64,
            rup_mag in -2.0..10.0_f64,
            k_prod in 0.0..100.0_f64,
            rup_parent in -1..10_000_i32,
            x_km in -500.0..500.0_f64,
            y_km in -500.0..500.0_f64,
        ) {
            let rup = Rupture { t_day, rup_mag, k_prod, rup_parent, x_km, y_km };
            let mut store = MarshalStore::new();
            rup.marshal(&mut store);
            prop_assert_eq!(Rupture::unmarshal(&mut store).unwrap(), rup);
        }

        #[test]
        fn any_generation_info_round_trips(
            gen_size in 0..1_000_000usize,
            gen_mag_min in -2.0..10.0_f64,
            span in 0.0..12.0_f64,
        ) {
            let info = GenerationInfo::new(gen_size, gen_mag_min, gen_mag_min + span);
            let mut store = MarshalStore::new();
            info.marshal(&mut store);
            prop_assert_eq!(GenerationInfo::unmarshal(&mut store).unwrap(), info);
        }
    }
}
