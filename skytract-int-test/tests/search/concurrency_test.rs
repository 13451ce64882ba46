//! Searches sharing one skymap and catalog across threads.

use skytract::errors::SkyResult;
use skytract::{PointFrame, TilingScheme, TractPatchQuery};
use skytract_int_test::test_util::{create_small_sky_context, run_test};
use std::thread;

#[test]
fn test_concurrent_searches_agree() {
    run_test(create_small_sky_context, |ctx| {
        let skymap = ctx.skymap();
        let query = TractPatchQuery::tract(792).patch(62);
        let expected = ctx
            .catalog()
            .tract_patch_search(skymap.as_ref(), query)?
            .compute()?;

        let results = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let skymap = ctx.skymap();
                    let catalog = ctx.catalog().clone();
                    scope.spawn(move || -> SkyResult<PointFrame> {
                        // Warm a different tract on every thread
                        let _ = skymap.tract(780 + i);
                        catalog.tract_patch_search(skymap.as_ref(), query)?.compute()
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|_| panic!("search thread panicked")))
                .collect::<Vec<_>>()
        });

        for result in results {
            assert_eq!(result?, expected);
        }
        Ok(())
    })
}

#[test]
fn test_shared_tracts_are_memoized() {
    run_test(create_small_sky_context, |ctx| {
        let skymap = ctx.skymap();
        let tracts = thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let skymap = ctx.skymap();
                    scope.spawn(move || skymap.tract(792))
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|_| panic!("tract thread panicked")))
                .collect::<Vec<_>>()
        });
        let first = skymap.tract(792)?;
        for tract in tracts {
            assert_eq!(*tract?, *first);
        }
        Ok(())
    })
}
