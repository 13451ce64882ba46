//! Tract and patch searches against the small sky fixture and the default
//! rings skymap.

use skytract::errors::SkyError;
use skytract::{polygon_filter, LonLat, TilingScheme, TractPatchQuery, TractPatchSearch};
use skytract_int_test::test_util::{create_small_sky_context, id_set, run_test};

#[test]
fn test_tract_792_outer_and_inner() {
    run_test(create_small_sky_context, |ctx| {
        let skymap = ctx.skymap();
        let outer = ctx
            .catalog()
            .tract_patch_search(skymap.as_ref(), TractPatchQuery::tract(792))?
            .compute()?;
        let inner = ctx
            .catalog()
            .tract_patch_search(skymap.as_ref(), TractPatchQuery::tract(792).use_inner(true))?
            .compute()?;

        assert!(!outer.is_empty());
        assert!(!inner.is_empty());
        assert!(inner.len() <= outer.len());
        assert!(id_set(&inner).is_subset(&id_set(&outer)));
        Ok(())
    })
}

#[test]
fn test_tract_792_holds_its_center() {
    run_test(create_small_sky_context, |ctx| {
        let skymap = ctx.skymap();
        let tract = skymap.tract(792)?;
        assert_eq!(skymap.find_tract(&tract.center()), 792);
        let [nx, ny] = tract.num_patches();
        assert!(nx * ny > 62);
        Ok(())
    })
}

#[test]
fn test_tract_792_patch_62() {
    run_test(create_small_sky_context, |ctx| {
        let skymap = ctx.skymap();
        let catalog = ctx.catalog();

        let tract = catalog
            .tract_patch_search(skymap.as_ref(), TractPatchQuery::tract(792))?
            .compute()?;
        let patch_outer = catalog
            .tract_patch_search(skymap.as_ref(), TractPatchQuery::tract(792).patch(62))?
            .compute()?;
        let patch_inner = catalog
            .tract_patch_search(
                skymap.as_ref(),
                TractPatchQuery::tract(792).patch(62).use_inner(true),
            )?
            .compute()?;

        assert!(!patch_outer.is_empty());
        assert!(!patch_inner.is_empty());
        assert!(patch_inner.len() <= patch_outer.len());
        assert!(patch_outer.len() <= tract.len());
        assert!(id_set(&patch_inner).is_subset(&id_set(&patch_outer)));
        Ok(())
    })
}

#[test]
fn test_out_of_footprint_tract_is_empty() {
    run_test(create_small_sky_context, |ctx| {
        let skymap = ctx.skymap();
        for use_inner in [false, true] {
            for query in [TractPatchQuery::tract(0), TractPatchQuery::tract(0).patch(0)] {
                let narrowed = ctx
                    .catalog()
                    .tract_patch_search(skymap.as_ref(), query.use_inner(use_inner))?;
                assert_eq!(narrowed.num_partitions(), 0);
                let result = narrowed.compute()?;
                assert_eq!(result.len(), 0);
                // Empty results keep the catalog's columns
                assert_eq!(result.column_names().count(), 3);
            }
        }
        Ok(())
    })
}

#[test]
fn test_fine_is_subset_of_coarse() {
    run_test(create_small_sky_context, |ctx| {
        let skymap = ctx.skymap();
        for query in [
            TractPatchQuery::tract(792),
            TractPatchQuery::tract(792).use_inner(true),
            TractPatchQuery::tract(792).patch(62),
            TractPatchQuery::tract(792).patch(62).use_inner(true),
        ] {
            let fine = ctx
                .catalog()
                .tract_patch_search(skymap.as_ref(), query)?
                .compute()?;
            let coarse = ctx
                .catalog()
                .tract_patch_search(skymap.as_ref(), query.fine(false))?;
            let coarse_rows = coarse.compute()?;

            assert_eq!(coarse_rows.len(), coarse.hc_structure().total_rows());
            assert!(id_set(&fine).is_subset(&id_set(&coarse_rows)));
            assert!(fine.len() < coarse_rows.len());
        }
        Ok(())
    })
}

#[test]
fn test_matches_brute_force() {
    run_test(create_small_sky_context, |ctx| {
        let skymap = ctx.skymap();
        let metadata = ctx.catalog().metadata().clone();
        for query in [
            TractPatchQuery::tract(792),
            TractPatchQuery::tract(792).use_inner(true),
            TractPatchQuery::tract(792).patch(62),
            TractPatchQuery::tract(792).patch(62).use_inner(true),
            TractPatchQuery::tract(792).patch(0),
        ] {
            let search = TractPatchSearch::new(skymap.as_ref(), query)?;
            let expected = polygon_filter(ctx.frame(), search.fine_region(), &metadata)?;
            let actual = ctx.catalog().search(search)?.compute()?;
            assert_eq!(id_set(&actual), id_set(&expected), "query {:?}", query);
        }
        Ok(())
    })
}

#[test]
fn test_search_is_idempotent() {
    run_test(create_small_sky_context, |ctx| {
        let skymap = ctx.skymap();
        let query = TractPatchQuery::tract(792).patch(62);

        let first = ctx
            .catalog()
            .tract_patch_search(skymap.as_ref(), query)?
            .compute()?;
        let second = ctx
            .catalog()
            .tract_patch_search(skymap.as_ref(), query)?
            .compute()?;
        assert_eq!(first, second);

        let twice = ctx
            .catalog()
            .tract_patch_search(skymap.as_ref(), query)?
            .tract_patch_search(skymap.as_ref(), query)?
            .compute()?;
        assert_eq!(twice, first);
        Ok(())
    })
}

#[test]
fn test_rows_keep_their_columns() {
    run_test(create_small_sky_context, |ctx| {
        let skymap = ctx.skymap();
        let result = ctx
            .catalog()
            .tract_patch_search(skymap.as_ref(), TractPatchQuery::tract(792).use_inner(true))?
            .compute()?;
        let tract = skymap.tract(792)?;
        let ra = result.column("ra")?;
        let dec = result.column("dec")?;
        assert_eq!(result.column("mag")?.len(), result.len());
        for (ra, dec) in ra.iter().zip(dec) {
            let coord = LonLat::new(*ra, *dec)?;
            assert!(tract.inner_sky_region().contains_lonlat(&coord));
        }
        Ok(())
    })
}

#[test]
fn test_invalid_tract_and_patch() {
    run_test(create_small_sky_context, |ctx| {
        let skymap = ctx.skymap();
        let result = ctx
            .catalog()
            .tract_patch_search(skymap.as_ref(), TractPatchQuery::tract(skymap.num_tracts()));
        assert!(matches!(result, Err(SkyError::InvalidRegion(_))));

        let patch_count = skymap.tract(792)?.patch_count();
        let result = ctx.catalog().tract_patch_search(
            skymap.as_ref(),
            TractPatchQuery::tract(792).patch(patch_count),
        );
        assert!(matches!(result, Err(SkyError::InvalidRegion(_))));
        Ok(())
    })
}
