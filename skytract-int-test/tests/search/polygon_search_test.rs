//! Free-form polygon searches through the same extension point.

use skytract::errors::SkyError;
use skytract::{
    polygon_filter, LonLat, PolygonSearch, Search, SearchProvider, TilingScheme, TractPatchQuery,
};
use skytract_int_test::test_util::{create_small_sky_context, id_set, run_test};

fn square(lon: f64, lat: f64, half: f64) -> Vec<LonLat> {
    [(-half, -half), (half, -half), (half, half), (-half, half)]
        .iter()
        .map(|(dx, dy)| LonLat::new(lon + dx, lat + dy).unwrap())
        .collect()
}

#[test]
fn test_polygon_search_matches_brute_force() {
    run_test(create_small_sky_context, |ctx| {
        let search = PolygonSearch::new(square(15.0, 5.0, 2.0), true)?;
        let expected = polygon_filter(ctx.frame(), search.region(), ctx.catalog().metadata())?;
        let actual = ctx.catalog().search(search)?.compute()?;
        assert!(!actual.is_empty());
        assert_eq!(id_set(&actual), id_set(&expected));
        Ok(())
    })
}

#[test]
fn test_polygon_search_combines_with_tract_search() {
    run_test(create_small_sky_context, |ctx| {
        let skymap = ctx.skymap();
        let tract = skymap.tract(792)?;
        let center = tract.center();

        let box_search = Search::new(PolygonSearch::new(
            square(center.lon(), center.lat(), 0.3),
            true,
        )?);
        let both = ctx
            .catalog()
            .search_with(box_search.clone())?
            .tract_patch_search(skymap.as_ref(), TractPatchQuery::tract(792))?
            .compute()?;
        let only_box = ctx.catalog().search_with(box_search)?.compute()?;
        assert!(!both.is_empty());
        assert_eq!(id_set(&both), id_set(&only_box));
        Ok(())
    })
}

#[test]
fn test_search_handle_downcasts() {
    let search = Search::new(PolygonSearch::new(square(100.0, 0.0, 1.0), false).unwrap());
    assert!(!search.fine());
    assert!(search.as_any().downcast_ref::<PolygonSearch>().is_some());
    assert!(search.to_string().starts_with("PolygonSearch(POLYGON("));
}

#[test]
fn test_malformed_polygon_propagates() {
    let vertices = vec![
        LonLat::new(0.0, 0.0).unwrap(),
        LonLat::new(10.0, 10.0).unwrap(),
        LonLat::new(10.0, 0.0).unwrap(),
        LonLat::new(0.0, 10.0).unwrap(),
    ];
    let result = PolygonSearch::new(vertices, true);
    assert!(matches!(result, Err(SkyError::MalformedPolygon(_))));
}
