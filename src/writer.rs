//! Indented GPX serialization over `quick_xml::Writer`.
//!
//! Output is deterministic: an XML declaration, then the `<gpx>` tree
//! indented four spaces per level. `None` fields are omitted entirely;
//! childless elements are written self-closing. Vendor extension records
//! always use the explicit prefix form (`wptx1:`, `gpxx:`, `gpxtpx:`),
//! with all namespaces declared once on the root element.

use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::GpxError;
use crate::garmin::*;
use crate::model::*;

type Result<T> = std::result::Result<T, GpxError>;

/// Serialize a [`Gpx`] document into the given sink.
pub fn write_to<W: Write>(gpx: &Gpx, sink: W) -> Result<()> {
    let mut w = Writer::new_with_indent(sink, b' ', 4);
    emit(&mut w, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("gpx");
    root.push_attribute(("version", gpx.version.as_str()));
    root.push_attribute(("creator", gpx.creator.as_str()));
    root.push_attribute(("xmlns", GPX_NS));
    root.push_attribute(("xmlns:gpxx", GPXX_NS));
    root.push_attribute(("xmlns:gpxtpx", GPXTPX_NS));
    root.push_attribute(("xmlns:wptx1", WPTX1_NS));
    emit(&mut w, Event::Start(root))?;

    if let Some(metadata) = &gpx.metadata {
        write_metadata(&mut w, metadata)?;
    }
    for wpt in &gpx.waypoints {
        write_point(&mut w, "wpt", wpt, write_wpt_extensions)?;
    }
    for route in &gpx.routes {
        write_route(&mut w, route)?;
    }
    for track in &gpx.tracks {
        write_track(&mut w, track)?;
    }

    emit(&mut w, Event::End(BytesEnd::new("gpx")))
}

fn emit<W: Write>(w: &mut Writer<W>, event: Event<'_>) -> Result<()> {
    w.write_event(event).map_err(GpxError::EncodingFailure)
}

fn text_element<W: Write>(w: &mut Writer<W>, tag: &str, value: &str) -> Result<()> {
    emit(w, Event::Start(BytesStart::new(tag)))?;
    emit(w, Event::Text(BytesText::new(value)))?;
    emit(w, Event::End(BytesEnd::new(tag)))
}

fn opt_text<W: Write>(w: &mut Writer<W>, tag: &str, value: &Option<String>) -> Result<()> {
    if let Some(v) = value {
        text_element(w, tag, v)?;
    }
    Ok(())
}

/// Write an optional value via `Display`. Covers numbers (Rust's float
/// formatting is the shortest representation that parses back exactly),
/// booleans, and the open string enumerations.
fn opt_value<W: Write, T: std::fmt::Display>(
    w: &mut Writer<W>,
    tag: &str,
    value: &Option<T>,
) -> Result<()> {
    if let Some(v) = value {
        text_element(w, tag, &v.to_string())?;
    }
    Ok(())
}

fn write_metadata<W: Write>(w: &mut Writer<W>, metadata: &Metadata) -> Result<()> {
    if *metadata == Metadata::default() {
        return emit(w, Event::Empty(BytesStart::new("metadata")));
    }
    emit(w, Event::Start(BytesStart::new("metadata")))?;
    opt_text(w, "name", &metadata.name)?;
    opt_text(w, "desc", &metadata.desc)?;
    if let Some(author) = &metadata.author {
        write_person(w, author)?;
    }
    if let Some(copyright) = &metadata.copyright {
        write_copyright(w, copyright)?;
    }
    for link in &metadata.links {
        write_link(w, link)?;
    }
    opt_text(w, "time", &metadata.time)?;
    opt_text(w, "keywords", &metadata.keywords)?;
    if let Some(bounds) = &metadata.bounds {
        write_bounds(w, bounds)?;
    }
    if metadata.extensions.is_some() {
        emit(w, Event::Empty(BytesStart::new("extensions")))?;
    }
    emit(w, Event::End(BytesEnd::new("metadata")))
}

fn write_person<W: Write>(w: &mut Writer<W>, person: &Person) -> Result<()> {
    emit(w, Event::Start(BytesStart::new("author")))?;
    opt_text(w, "name", &person.name)?;
    if let Some(email) = &person.email {
        let mut e = BytesStart::new("email");
        if let Some(id) = &email.id {
            e.push_attribute(("id", id.as_str()));
        }
        if let Some(domain) = &email.domain {
            e.push_attribute(("domain", domain.as_str()));
        }
        emit(w, Event::Empty(e))?;
    }
    if let Some(link) = &person.link {
        write_link(w, link)?;
    }
    emit(w, Event::End(BytesEnd::new("author")))
}

fn write_copyright<W: Write>(w: &mut Writer<W>, copyright: &Copyright) -> Result<()> {
    let mut start = BytesStart::new("copyright");
    start.push_attribute(("author", copyright.author.as_str()));
    if copyright.year.is_none() && copyright.license.is_none() {
        return emit(w, Event::Empty(start));
    }
    emit(w, Event::Start(start))?;
    opt_value(w, "year", &copyright.year)?;
    opt_text(w, "license", &copyright.license)?;
    emit(w, Event::End(BytesEnd::new("copyright")))
}

fn write_link<W: Write>(w: &mut Writer<W>, link: &Link) -> Result<()> {
    let mut start = BytesStart::new("link");
    start.push_attribute(("href", link.href.as_str()));
    if link.text.is_none() && link.link_type.is_none() {
        return emit(w, Event::Empty(start));
    }
    emit(w, Event::Start(start))?;
    opt_text(w, "text", &link.text)?;
    opt_text(w, "type", &link.link_type)?;
    emit(w, Event::End(BytesEnd::new("link")))
}

fn write_bounds<W: Write>(w: &mut Writer<W>, bounds: &Bounds) -> Result<()> {
    let min_lat = bounds.min_lat.to_string();
    let min_lon = bounds.min_lon.to_string();
    let max_lat = bounds.max_lat.to_string();
    let max_lon = bounds.max_lon.to_string();
    let mut e = BytesStart::new("bounds");
    e.push_attribute(("minlat", min_lat.as_str()));
    e.push_attribute(("minlon", min_lon.as_str()));
    e.push_attribute(("maxlat", max_lat.as_str()));
    e.push_attribute(("maxlon", max_lon.as_str()));
    emit(w, Event::Empty(e))
}

fn point_is_bare<E>(p: &Point<E>) -> bool {
    p.ele.is_none()
        && p.time.is_none()
        && p.magvar.is_none()
        && p.geoid_height.is_none()
        && p.name.is_none()
        && p.cmt.is_none()
        && p.desc.is_none()
        && p.src.is_none()
        && p.links.is_empty()
        && p.sym.is_none()
        && p.point_type.is_none()
        && p.fix.is_none()
        && p.sat.is_none()
        && p.hdop.is_none()
        && p.vdop.is_none()
        && p.pdop.is_none()
        && p.age_of_dgps_data.is_none()
        && p.dgps_id.is_none()
        && p.extensions.is_none()
}

/// Write a point element (wpt, rtept, trkpt). Child order follows the
/// GPX 1.1 schema sequence. The caller supplies the writer for the
/// point kind's `<extensions>` block.
fn write_point<W: Write, E>(
    w: &mut Writer<W>,
    tag: &str,
    point: &Point<E>,
    write_ext: fn(&mut Writer<W>, &E) -> Result<()>,
) -> Result<()> {
    let lat = point.lat.to_string();
    let lon = point.lon.to_string();
    let mut start = BytesStart::new(tag);
    start.push_attribute(("lat", lat.as_str()));
    start.push_attribute(("lon", lon.as_str()));
    if point_is_bare(point) {
        return emit(w, Event::Empty(start));
    }
    emit(w, Event::Start(start))?;
    opt_value(w, "ele", &point.ele)?;
    opt_text(w, "time", &point.time)?;
    opt_value(w, "magvar", &point.magvar)?;
    opt_value(w, "geoidheight", &point.geoid_height)?;
    opt_text(w, "name", &point.name)?;
    opt_text(w, "cmt", &point.cmt)?;
    opt_text(w, "desc", &point.desc)?;
    opt_text(w, "src", &point.src)?;
    for link in &point.links {
        write_link(w, link)?;
    }
    opt_text(w, "sym", &point.sym)?;
    opt_text(w, "type", &point.point_type)?;
    opt_value(w, "fix", &point.fix)?;
    opt_value(w, "sat", &point.sat)?;
    opt_value(w, "hdop", &point.hdop)?;
    opt_value(w, "vdop", &point.vdop)?;
    opt_value(w, "pdop", &point.pdop)?;
    opt_value(w, "ageofdgpsdata", &point.age_of_dgps_data)?;
    opt_value(w, "dgpsid", &point.dgps_id)?;
    if let Some(ext) = &point.extensions {
        write_ext(w, ext)?;
    }
    emit(w, Event::End(BytesEnd::new(tag)))
}

fn write_route<W: Write>(w: &mut Writer<W>, route: &Route) -> Result<()> {
    emit(w, Event::Start(BytesStart::new("rte")))?;
    opt_text(w, "name", &route.name)?;
    opt_text(w, "cmt", &route.cmt)?;
    opt_text(w, "desc", &route.desc)?;
    opt_text(w, "src", &route.src)?;
    for link in &route.links {
        write_link(w, link)?;
    }
    opt_value(w, "number", &route.number)?;
    opt_text(w, "type", &route.route_type)?;
    if let Some(ext) = &route.extensions {
        write_route_extensions(w, ext)?;
    }
    for point in &route.points {
        write_point(w, "rtept", point, write_rtept_extensions)?;
    }
    emit(w, Event::End(BytesEnd::new("rte")))
}

fn write_track<W: Write>(w: &mut Writer<W>, track: &Track) -> Result<()> {
    emit(w, Event::Start(BytesStart::new("trk")))?;
    opt_text(w, "name", &track.name)?;
    opt_text(w, "cmt", &track.cmt)?;
    opt_text(w, "desc", &track.desc)?;
    opt_text(w, "src", &track.src)?;
    for link in &track.links {
        write_link(w, link)?;
    }
    opt_value(w, "number", &track.number)?;
    opt_text(w, "type", &track.track_type)?;
    if let Some(ext) = &track.extensions {
        write_track_extensions(w, ext)?;
    }
    for segment in &track.segments {
        write_segment(w, segment)?;
    }
    emit(w, Event::End(BytesEnd::new("trk")))
}

fn write_segment<W: Write>(w: &mut Writer<W>, segment: &TrackSegment) -> Result<()> {
    if segment.points.is_empty() && segment.extensions.is_none() {
        return emit(w, Event::Empty(BytesStart::new("trkseg")));
    }
    emit(w, Event::Start(BytesStart::new("trkseg")))?;
    for point in &segment.points {
        write_point(w, "trkpt", point, write_trkpt_extensions)?;
    }
    if segment.extensions.is_some() {
        emit(w, Event::Empty(BytesStart::new("extensions")))?;
    }
    emit(w, Event::End(BytesEnd::new("trkseg")))
}

// ---- vendor extension blocks (always the prefixed form) ----

fn nested_marker<W: Write>(w: &mut Writer<W>, tag: &str, marker: &Option<Extensions>) -> Result<()> {
    if marker.is_some() {
        emit(w, Event::Empty(BytesStart::new(tag)))?;
    }
    Ok(())
}

fn write_wpt_extensions<W: Write>(w: &mut Writer<W>, ext: &WayPointExtension) -> Result<()> {
    emit(w, Event::Start(BytesStart::new("extensions")))?;
    if *ext == WayPointExtension::default() {
        emit(w, Event::Empty(BytesStart::new("wptx1:WaypointExtension")))?;
    } else {
        emit(w, Event::Start(BytesStart::new("wptx1:WaypointExtension")))?;
        opt_value(w, "wptx1:Proximity", &ext.proximity)?;
        opt_value(w, "wptx1:Temperature", &ext.temperature)?;
        opt_value(w, "wptx1:Depth", &ext.depth)?;
        opt_value(w, "wptx1:DisplayMode", &ext.display_mode)?;
        if !ext.categories.is_empty() {
            emit(w, Event::Start(BytesStart::new("wptx1:Categories")))?;
            for category in &ext.categories {
                text_element(w, "wptx1:Category", category)?;
            }
            emit(w, Event::End(BytesEnd::new("wptx1:Categories")))?;
        }
        if let Some(address) = &ext.address {
            write_address(w, address)?;
        }
        for phone in &ext.phone_numbers {
            write_phone_number(w, phone)?;
        }
        opt_value(w, "wptx1:Samples", &ext.samples)?;
        opt_text(w, "wptx1:Expiration", &ext.expiration)?;
        emit(w, Event::End(BytesEnd::new("wptx1:WaypointExtension")))?;
    }
    emit(w, Event::End(BytesEnd::new("extensions")))
}

fn write_address<W: Write>(w: &mut Writer<W>, address: &Address) -> Result<()> {
    emit(w, Event::Start(BytesStart::new("wptx1:Address")))?;
    for line in &address.street_address {
        text_element(w, "wptx1:StreetAddress", line)?;
    }
    opt_text(w, "wptx1:City", &address.city)?;
    opt_text(w, "wptx1:State", &address.state)?;
    opt_text(w, "wptx1:Country", &address.country)?;
    opt_text(w, "wptx1:PostalCode", &address.postal_code)?;
    nested_marker(w, "wptx1:Extensions", &address.extensions)?;
    emit(w, Event::End(BytesEnd::new("wptx1:Address")))
}

/// The published schema carries the number as text content with an
/// optional `Category` attribute.
fn write_phone_number<W: Write>(w: &mut Writer<W>, phone: &PhoneNumber) -> Result<()> {
    let mut start = BytesStart::new("wptx1:PhoneNumber");
    if let Some(category) = &phone.category {
        start.push_attribute(("Category", category.as_str()));
    }
    match &phone.number {
        Some(number) => {
            emit(w, Event::Start(start))?;
            emit(w, Event::Text(BytesText::new(number)))?;
            emit(w, Event::End(BytesEnd::new("wptx1:PhoneNumber")))
        }
        None => emit(w, Event::Empty(start)),
    }
}

fn write_route_extensions<W: Write>(w: &mut Writer<W>, ext: &RouteExtension) -> Result<()> {
    emit(w, Event::Start(BytesStart::new("extensions")))?;
    if *ext == RouteExtension::default() {
        emit(w, Event::Empty(BytesStart::new("gpxx:RouteExtension")))?;
    } else {
        emit(w, Event::Start(BytesStart::new("gpxx:RouteExtension")))?;
        opt_value(w, "gpxx:IsAutoNamed", &ext.is_auto_named)?;
        opt_value(w, "gpxx:DisplayColor", &ext.display_color)?;
        nested_marker(w, "gpxx:Extensions", &ext.extensions)?;
        emit(w, Event::End(BytesEnd::new("gpxx:RouteExtension")))?;
    }
    emit(w, Event::End(BytesEnd::new("extensions")))
}

fn write_rtept_extensions<W: Write>(w: &mut Writer<W>, ext: &RoutePointExtension) -> Result<()> {
    emit(w, Event::Start(BytesStart::new("extensions")))?;
    if *ext == RoutePointExtension::default() {
        emit(w, Event::Empty(BytesStart::new("gpxx:RoutePointExtension")))?;
    } else {
        emit(w, Event::Start(BytesStart::new("gpxx:RoutePointExtension")))?;
        opt_text(w, "gpxx:Subclass", &ext.subclass)?;
        if let Some(rpt) = &ext.auto_route_point {
            let lat = rpt.lat.to_string();
            let lon = rpt.lon.to_string();
            let mut start = BytesStart::new("gpxx:rpt");
            start.push_attribute(("lat", lat.as_str()));
            start.push_attribute(("lon", lon.as_str()));
            match &rpt.subclass {
                Some(subclass) => {
                    emit(w, Event::Start(start))?;
                    text_element(w, "gpxx:Subclass", subclass)?;
                    emit(w, Event::End(BytesEnd::new("gpxx:rpt")))?;
                }
                None => emit(w, Event::Empty(start))?,
            }
        }
        nested_marker(w, "gpxx:Extensions", &ext.extensions)?;
        emit(w, Event::End(BytesEnd::new("gpxx:RoutePointExtension")))?;
    }
    emit(w, Event::End(BytesEnd::new("extensions")))
}

fn write_track_extensions<W: Write>(w: &mut Writer<W>, ext: &TrackExtension) -> Result<()> {
    emit(w, Event::Start(BytesStart::new("extensions")))?;
    if *ext == TrackExtension::default() {
        emit(w, Event::Empty(BytesStart::new("gpxx:TrackExtension")))?;
    } else {
        emit(w, Event::Start(BytesStart::new("gpxx:TrackExtension")))?;
        opt_value(w, "gpxx:DisplayColor", &ext.display_color)?;
        nested_marker(w, "gpxx:Extensions", &ext.extensions)?;
        emit(w, Event::End(BytesEnd::new("gpxx:TrackExtension")))?;
    }
    emit(w, Event::End(BytesEnd::new("extensions")))
}

fn write_trkpt_extensions<W: Write>(w: &mut Writer<W>, ext: &TrackPointExtension) -> Result<()> {
    emit(w, Event::Start(BytesStart::new("extensions")))?;
    if *ext == TrackPointExtension::default() {
        emit(w, Event::Empty(BytesStart::new("gpxtpx:TrackPointExtension")))?;
    } else {
        emit(w, Event::Start(BytesStart::new("gpxtpx:TrackPointExtension")))?;
        opt_value(w, "gpxtpx:atemp", &ext.air_temperature)?;
        opt_value(w, "gpxtpx:wtemp", &ext.water_temperature)?;
        opt_value(w, "gpxtpx:depth", &ext.depth)?;
        opt_value(w, "gpxtpx:hr", &ext.heart_rate)?;
        opt_value(w, "gpxtpx:cad", &ext.cadence)?;
        nested_marker(w, "gpxtpx:extensions", &ext.extensions)?;
        emit(w, Event::End(BytesEnd::new("gpxtpx:TrackPointExtension")))?;
    }
    emit(w, Event::End(BytesEnd::new("extensions")))
}
