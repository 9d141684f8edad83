use std::path::Path;

use crate::error::Result;
use crate::geometric::RegionPolygon;

/// Write a standalone interactive map (Leaflet over CartoDB Positron tiles)
/// with the region polygon overlaid as GeoJSON. The view is anchored on the
/// polygon's first ring vertex; clicking the map pops up the coordinates
/// under the cursor.
pub fn show_on_map(polygon: &RegionPolygon, path: &Path, zoom: u8) -> Result<()> {
    let (lon, lat) = polygon.first_vertex();
    let geojson = polygon.to_geojson().to_string();

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8"/>
<title>Region polygon</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css"/>
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>html, body, #map {{ height: 100%; margin: 0; }}</style>
</head>
<body>
<div id="map"></div>
<script>
var map = L.map('map').setView([{lat}, {lon}], {zoom});
L.tileLayer('https://{{s}}.basemaps.cartocdn.com/light_all/{{z}}/{{x}}/{{y}}.png', {{
    attribution: '&copy; OpenStreetMap contributors &copy; CARTO',
    maxZoom: 19
}}).addTo(map);
L.geoJSON({geojson}).addTo(map);
map.on('click', function(e) {{
    L.popup()
        .setLatLng(e.latlng)
        .setContent(e.latlng.lat.toFixed(6) + ', ' + e.latlng.lng.toFixed(6))
        .openOn(map);
}});
</script>
</body>
</html>
"#,
        lat = lat,
        lon = lon,
        zoom = zoom,
        geojson = geojson,
    );

    std::fs::write(path, html)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_html_anchors_on_first_vertex() {
        let polygon = RegionPolygon::new(
            &[
                (-93.756155, 41.918015),
                (-93.756155, 41.921429),
                (-93.747334, 41.921429),
                (-93.747334, 41.918015),
            ],
            4326,
        )
        .unwrap();
        let path = std::env::temp_dir().join("rs3dep_test_map.html");

        show_on_map(&polygon, &path, 15).unwrap();

        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("setView([41.918015, -93.756155], 15)"));
        assert!(html.contains("L.geoJSON"));
        assert!(html.contains("\"Polygon\""));
        let _ = std::fs::remove_file(&path);
    }
}
