use gpx_xml::garmin::{DisplayColor, RouteExtension, TrackPointExtension, WayPointExtension};
use gpx_xml::{
    Bounds, Copyright, Decoder, Encoder, Extensions, Fix, Gpx, GpxError, Link, Metadata, Route,
    RoutePoint, Track, TrackPoint, TrackSegment, WayPoint,
};

fn round_trip(gpx: &Gpx) -> Gpx {
    let bytes = gpx_xml::encode(gpx).unwrap();
    gpx_xml::decode(&bytes).unwrap()
}

#[test]
fn test_round_trip_required_fields_only() {
    let mut gpx = Gpx::new("1.1", "roundtrip");
    gpx.waypoints.push(WayPoint::new(35.6762, 139.6503));
    let mut route = Route::default();
    route.points.push(RoutePoint::new(35.0, 139.0));
    route.points.push(RoutePoint::new(36.0, 140.0));
    gpx.routes.push(route);
    let mut track = Track::default();
    let mut segment = TrackSegment::default();
    segment.points.push(TrackPoint::new(35.0, 139.0));
    track.segments.push(segment);
    gpx.tracks.push(track);

    assert_eq!(round_trip(&gpx), gpx);
}

#[test]
fn test_round_trip_boundary_coordinates() {
    let mut gpx = Gpx::new("1.1", "roundtrip");
    gpx.waypoints.push(WayPoint::new(90.0, 180.0));
    gpx.waypoints.push(WayPoint::new(-90.0, -180.0));
    gpx.waypoints.push(WayPoint::new(38.92747367732227, -77.02016168273985));

    let decoded = round_trip(&gpx);
    assert_eq!(decoded.waypoints[0].lat, 90.0);
    assert_eq!(decoded.waypoints[0].lon, 180.0);
    assert_eq!(decoded.waypoints[1].lat, -90.0);
    assert_eq!(decoded.waypoints[1].lon, -180.0);
    assert_eq!(decoded.waypoints[2].lat, 38.92747367732227);
    assert_eq!(decoded.waypoints[2].lon, -77.02016168273985);
}

#[test]
fn test_round_trip_full_document() {
    let mut gpx = Gpx::new("1.1", "roundtrip");
    gpx.metadata = Some(Metadata {
        name: Some("Evening ride".to_string()),
        desc: Some("Commute home".to_string()),
        copyright: Some(Copyright {
            author: "Jane Doe".to_string(),
            year: Some(2024),
            license: Some("https://example.com/license".to_string()),
        }),
        links: vec![Link {
            href: "https://example.com".to_string(),
            text: Some("Example".to_string()),
            link_type: Some("text/html".to_string()),
        }],
        time: Some("2024-06-01T18:00:00Z".to_string()),
        keywords: Some("commute, cycling".to_string()),
        bounds: Some(Bounds {
            min_lat: 38.0,
            min_lon: -78.0,
            max_lat: 39.0,
            max_lon: -77.0,
        }),
        ..Metadata::default()
    });

    let mut wpt = WayPoint::new(38.5, -77.5);
    wpt.ele = Some(120.5);
    wpt.time = Some("2024-06-01T18:05:00Z".to_string());
    wpt.name = Some("Water stop".to_string());
    wpt.sym = Some("Water Source".to_string());
    wpt.fix = Some(Fix::new(Fix::THREE_D));
    wpt.sat = Some(11);
    wpt.hdop = Some(0.9);
    wpt.dgps_id = Some(17);
    wpt.extensions = Some(WayPointExtension {
        proximity: Some(30.0),
        temperature: Some(24.5),
        categories: vec!["Hydration".to_string()],
        ..WayPointExtension::default()
    });
    gpx.waypoints.push(wpt);

    let mut route = Route::default();
    route.name = Some("Main loop".to_string());
    route.number = Some(2);
    route.extensions = Some(RouteExtension {
        is_auto_named: Some(false),
        display_color: Some(DisplayColor::new(DisplayColor::MAGENTA)),
        extensions: Some(Extensions),
    });
    route.points.push(RoutePoint::new(38.4, -77.4));
    gpx.routes.push(route);

    let mut track = Track::default();
    track.name = Some("Recorded".to_string());
    let mut segment = TrackSegment::default();
    let mut pt = TrackPoint::new(38.92747367732227, -77.02016168273985);
    pt.ele = Some(25.600000381469727);
    pt.time = Some("2012-10-24T23:29:40.000Z".to_string());
    pt.extensions = Some(TrackPointExtension {
        air_temperature: Some(21.5),
        heart_rate: Some(130),
        cadence: Some(88),
        ..TrackPointExtension::default()
    });
    segment.points.push(pt);
    track.segments.push(segment);
    gpx.tracks.push(track);

    assert_eq!(round_trip(&gpx), gpx);
}

#[test]
fn test_round_trip_bare_copyright_and_empty_containers() {
    // These all encode self-closing and must still decode to the same record
    let mut gpx = Gpx::new("1.1", "roundtrip");
    gpx.metadata = Some(Metadata {
        copyright: Some(Copyright {
            author: "Jane Doe".to_string(),
            year: None,
            license: None,
        }),
        ..Metadata::default()
    });
    gpx.routes.push(Route::default());
    gpx.tracks.push(Track::default());

    assert_eq!(round_trip(&gpx), gpx);
}

#[test]
fn test_optional_fields_absent_stay_absent() {
    let mut gpx = Gpx::new("1.1", "roundtrip");
    gpx.waypoints.push(WayPoint::new(1.0, 2.0));

    let bytes = gpx_xml::encode(&gpx).unwrap();
    let xml = String::from_utf8(bytes.clone()).unwrap();
    assert!(!xml.contains("<ele>"));
    assert!(!xml.contains("<name>"));

    let decoded = gpx_xml::decode(&bytes).unwrap();
    assert!(decoded.waypoints[0].ele.is_none());
    assert!(decoded.waypoints[0].name.is_none());
    assert!(decoded.waypoints[0].extensions.is_none());
}

#[test]
fn test_zero_elevation_distinct_from_absent() {
    let mut gpx = Gpx::new("1.1", "roundtrip");
    let mut wpt = WayPoint::new(1.0, 2.0);
    wpt.ele = Some(0.0);
    gpx.waypoints.push(wpt);

    let bytes = gpx_xml::encode(&gpx).unwrap();
    let xml = String::from_utf8(bytes.clone()).unwrap();
    assert!(xml.contains("<ele>0</ele>"));
    assert_eq!(gpx_xml::decode(&bytes).unwrap().waypoints[0].ele, Some(0.0));
}

#[test]
fn test_unknown_enumeration_survives_round_trip() {
    let mut gpx = Gpx::new("1.1", "roundtrip");
    let mut wpt = WayPoint::new(1.0, 2.0);
    wpt.fix = Some(Fix::new("experimental"));
    gpx.waypoints.push(wpt);

    let decoded = round_trip(&gpx);
    assert_eq!(decoded.waypoints[0].fix.as_ref().unwrap().as_str(), "experimental");
}

#[test]
fn test_missing_file_is_source_unavailable() {
    let err = gpx_xml::parse_file("/no/such/directory/ride.gpx").unwrap_err();
    assert!(matches!(err, GpxError::SourceUnavailable { .. }));
}

#[test]
fn test_bad_content_is_malformed_input() {
    let err = gpx_xml::decode(b"this is not xml <gpx").unwrap_err();
    assert!(matches!(err, GpxError::MalformedInput { .. }));
}

#[test]
fn test_write_file_appends_gpx_suffix() {
    let dir = tempfile::tempdir().unwrap();
    let gpx = Gpx::new("1.1", "roundtrip");

    gpx_xml::write_file(&gpx, dir.path().join("export")).unwrap();
    assert!(dir.path().join("export.gpx").exists());

    gpx_xml::write_file(&gpx, dir.path().join("named.gpx")).unwrap();
    assert!(dir.path().join("named.gpx").exists());
    assert!(!dir.path().join("named.gpx.gpx").exists());
}

#[test]
fn test_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("track.gpx");

    let mut gpx = Gpx::new("1.1", "roundtrip");
    let mut track = Track::default();
    let mut segment = TrackSegment::default();
    segment.points.push(TrackPoint::new(35.0, 139.0));
    track.segments.push(segment);
    gpx.tracks.push(track);

    gpx_xml::write_file(&gpx, &path).unwrap();
    assert_eq!(gpx_xml::parse_file(&path).unwrap(), gpx);
}

#[test]
fn test_streaming_handles() {
    let mut gpx = Gpx::new("1.1", "roundtrip");
    gpx.waypoints.push(WayPoint::new(35.0, 139.0));

    let mut sink = Vec::new();
    Encoder::new(&mut sink).encode(&gpx).unwrap();

    let mut decoder = Decoder::new(std::io::Cursor::new(sink));
    assert_eq!(decoder.decode().unwrap(), gpx);
}

#[test]
fn test_document_serializes_to_json() {
    let mut gpx = Gpx::new("1.1", "roundtrip");
    let mut wpt = WayPoint::new(35.0, 139.0);
    wpt.name = Some("Tokyo".to_string());
    gpx.waypoints.push(wpt);

    let value = serde_json::to_value(&gpx).unwrap();
    assert_eq!(value["creator"], "roundtrip");
    assert_eq!(value["waypoints"][0]["name"], "Tokyo");
    assert_eq!(value["waypoints"][0]["lat"], 35.0);
}

#[test]
fn test_decode_garmin_device_output() {
    // Typical Garmin device output: prefixed extensions declared on the root
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="Garmin Edge 530"
     xmlns="http://www.topografix.com/GPX/1/1"
     xmlns:gpxtpx="http://www.garmin.com/xmlschemas/TrackPointExtension/v1"
     xmlns:gpxx="http://www.garmin.com/xmlschemas/GpxExtensions/v3">
  <metadata>
    <time>2012-10-24T23:22:51.000Z</time>
  </metadata>
  <trk>
    <name>Untitled</name>
    <trkseg>
      <trkpt lat="38.92747367732227" lon="-77.02016168273985">
        <ele>25.600000381469727</ele>
        <time>2012-10-24T23:29:40.000Z</time>
        <extensions>
          <gpxtpx:TrackPointExtension>
            <gpxtpx:hr>130</gpxtpx:hr>
          </gpxtpx:TrackPointExtension>
        </extensions>
      </trkpt>
    </trkseg>
  </trk>
</gpx>"#;
    let gpx = gpx_xml::parse(xml).unwrap();
    let pt = &gpx.tracks[0].segments[0].points[0];
    assert_eq!(pt.lat, 38.92747367732227);
    assert_eq!(pt.lon, -77.02016168273985);
    assert_eq!(pt.ele, Some(25.600000381469727));
    assert_eq!(pt.time.as_deref(), Some("2012-10-24T23:29:40.000Z"));
    assert_eq!(pt.extensions.as_ref().unwrap().heart_rate, Some(130));

    // and the re-encoded form decodes to the same document
    let decoded = gpx_xml::decode(&gpx_xml::encode(&gpx).unwrap()).unwrap();
    assert_eq!(decoded, gpx);
}
