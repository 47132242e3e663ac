use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::GpxError;
use crate::garmin::*;
use crate::model::*;

type Result<T> = std::result::Result<T, GpxError>;

/// Parse a GPX XML string into a [`Gpx`] document.
///
/// Decoding is permissive: missing attributes and elements default, unknown
/// content (including unrecognized extension records) is skipped, and only
/// ill-formed XML or a non-`<gpx>` root element fail. Element names are
/// matched by local name, so namespace-prefixed and default-namespace
/// documents decode identically.
pub fn parse(xml: &str) -> Result<Gpx> {
    let mut reader = Reader::from_str(xml);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if e.local_name().as_ref() == b"gpx" {
                    return parse_gpx(&e, &mut reader);
                }
                return Err(unexpected_root(&e));
            }
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"gpx" {
                    let mut gpx = Gpx::default();
                    parse_gpx_attributes(&e, &mut gpx)?;
                    return Ok(gpx);
                }
                return Err(unexpected_root(&e));
            }
            Ok(Event::Eof) => return Err(GpxError::malformed("missing <gpx> root element")),
            Err(e) => return Err(e.into()),
            _ => {} // XML declaration, comments, doctype
        }
    }
}

fn unexpected_root(e: &BytesStart<'_>) -> GpxError {
    GpxError::malformed(format!(
        "unexpected root element <{}>",
        String::from_utf8_lossy(e.name().as_ref())
    ))
}

/// Collect an element's attributes as (local name, raw value) pairs.
/// Attribute syntax errors count as malformed input.
fn attributes(e: &BytesStart<'_>) -> Result<Vec<(Vec<u8>, String)>> {
    let mut out = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| GpxError::malformed(format!("bad attribute: {err}")))?;
        let value = attr
            .unescape_value()
            .map(|v| v.into_owned())
            .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
        out.push((attr.key.local_name().as_ref().to_vec(), value));
    }
    Ok(out)
}

fn parse_gpx_attributes(e: &BytesStart<'_>, gpx: &mut Gpx) -> Result<()> {
    for (name, value) in attributes(e)? {
        match name.as_slice() {
            b"version" => gpx.version = value,
            b"creator" => gpx.creator = value,
            _ => {}
        }
    }
    Ok(())
}

fn parse_gpx<'a>(start: &BytesStart<'a>, reader: &mut Reader<&'a [u8]>) -> Result<Gpx> {
    let mut gpx = Gpx::default();
    parse_gpx_attributes(start, &mut gpx)?;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"metadata" => gpx.metadata = Some(parse_metadata(reader)?),
                b"wpt" => gpx
                    .waypoints
                    .push(parse_point(&e, reader, parse_wpt_extensions)?),
                b"rte" => gpx.routes.push(parse_route(reader)?),
                b"trk" => gpx.tracks.push(parse_track(reader)?),
                _ => skip(reader, &e)?,
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"metadata" => gpx.metadata = Some(Metadata::default()),
                b"wpt" => {
                    let (lat, lon) = parse_lat_lon(&e)?;
                    gpx.waypoints.push(WayPoint::new(lat, lon));
                }
                b"rte" => gpx.routes.push(Route::default()),
                b"trk" => gpx.tracks.push(Track::default()),
                _ => {}
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"gpx" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
    }

    Ok(gpx)
}

/// Skip an element and everything inside it.
fn skip<'a>(reader: &mut Reader<&'a [u8]>, e: &BytesStart<'a>) -> Result<()> {
    log::debug!(
        "skipping out-of-schema element <{}>",
        String::from_utf8_lossy(e.name().as_ref())
    );
    reader.read_to_end(e.name()).map_err(GpxError::from)?;
    Ok(())
}

/// Parse lat/lon attributes from a point-like element. Missing or
/// unparseable coordinates default to 0.0.
fn parse_lat_lon(e: &BytesStart<'_>) -> Result<(f64, f64)> {
    let mut lat = 0.0;
    let mut lon = 0.0;
    for (name, value) in attributes(e)? {
        match name.as_slice() {
            b"lat" => lat = value.parse().unwrap_or_default(),
            b"lon" => lon = value.parse().unwrap_or_default(),
            _ => {}
        }
    }
    Ok((lat, lon))
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.trim() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Parse a point element (wpt, rtept, trkpt) and its children. The
/// extension slot differs per point kind, so the caller supplies the
/// parser for the `<extensions>` block.
fn parse_point<'a, E>(
    start: &BytesStart<'a>,
    reader: &mut Reader<&'a [u8]>,
    parse_ext: fn(&mut Reader<&'a [u8]>) -> Result<Option<E>>,
) -> Result<Point<E>> {
    let (lat, lon) = parse_lat_lon(start)?;
    let mut point = Point::new(lat, lon);
    let end_name = start.name().0.to_vec();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"ele" => point.ele = read_text_owned(reader, &e)?.parse().ok(),
                b"time" => point.time = Some(read_text_owned(reader, &e)?),
                b"magvar" => point.magvar = read_text_owned(reader, &e)?.parse().ok(),
                b"geoidheight" => point.geoid_height = read_text_owned(reader, &e)?.parse().ok(),
                b"name" => point.name = Some(read_text_owned(reader, &e)?),
                b"cmt" => point.cmt = Some(read_text_owned(reader, &e)?),
                b"desc" => point.desc = Some(read_text_owned(reader, &e)?),
                b"src" => point.src = Some(read_text_owned(reader, &e)?),
                b"link" => point.links.push(parse_link(&e, reader)?),
                b"sym" => point.sym = Some(read_text_owned(reader, &e)?),
                b"type" => point.point_type = Some(read_text_owned(reader, &e)?),
                b"fix" => point.fix = Some(Fix::new(read_text_owned(reader, &e)?)),
                b"sat" => point.sat = read_text_owned(reader, &e)?.parse().ok(),
                b"hdop" => point.hdop = read_text_owned(reader, &e)?.parse().ok(),
                b"vdop" => point.vdop = read_text_owned(reader, &e)?.parse().ok(),
                b"pdop" => point.pdop = read_text_owned(reader, &e)?.parse().ok(),
                // "ageofgpsdata" is a misspelling some producers emit
                b"ageofdgpsdata" | b"ageofgpsdata" => {
                    point.age_of_dgps_data = read_text_owned(reader, &e)?.parse().ok()
                }
                b"dgpsid" => point.dgps_id = read_text_owned(reader, &e)?.parse().ok(),
                b"extensions" => point.extensions = parse_ext(reader)?,
                _ => skip(reader, &e)?,
            },
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"link" {
                    point.links.push(link_from_attributes(&e)?);
                }
            }
            Ok(Event::End(e)) if e.name().0 == end_name.as_slice() => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
    }

    Ok(point)
}

fn link_from_attributes(e: &BytesStart<'_>) -> Result<Link> {
    let mut link = Link::default();
    for (name, value) in attributes(e)? {
        if name == b"href" {
            link.href = value;
        }
    }
    Ok(link)
}

/// Parse a `<link>` element.
fn parse_link<'a>(start: &BytesStart<'a>, reader: &mut Reader<&'a [u8]>) -> Result<Link> {
    let mut link = link_from_attributes(start)?;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"text" => link.text = Some(read_text_owned(reader, &e)?),
                b"type" => link.link_type = Some(read_text_owned(reader, &e)?),
                _ => skip(reader, &e)?,
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"link" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
    }

    Ok(link)
}

/// Parse the `<metadata>` element.
fn parse_metadata<'a>(reader: &mut Reader<&'a [u8]>) -> Result<Metadata> {
    let mut metadata = Metadata::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"name" => metadata.name = Some(read_text_owned(reader, &e)?),
                b"desc" => metadata.desc = Some(read_text_owned(reader, &e)?),
                b"author" => metadata.author = Some(parse_person(reader)?),
                b"copyright" => metadata.copyright = Some(parse_copyright(&e, reader)?),
                b"link" => metadata.links.push(parse_link(&e, reader)?),
                b"time" => metadata.time = Some(read_text_owned(reader, &e)?),
                b"keywords" => metadata.keywords = Some(read_text_owned(reader, &e)?),
                b"bounds" => {
                    metadata.bounds = Some(parse_bounds(&e)?);
                    skip_to_end(reader, &e)?;
                }
                b"extensions" => {
                    metadata.extensions = Some(Extensions);
                    skip_to_end(reader, &e)?;
                }
                _ => skip(reader, &e)?,
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"bounds" => metadata.bounds = Some(parse_bounds(&e)?),
                b"copyright" => metadata.copyright = Some(copyright_from_attributes(&e)?),
                b"link" => metadata.links.push(link_from_attributes(&e)?),
                b"extensions" => metadata.extensions = Some(Extensions),
                _ => {}
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"metadata" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
    }

    Ok(metadata)
}

/// Consume the remaining events of an element whose content we already
/// extracted from its attributes.
fn skip_to_end<'a>(reader: &mut Reader<&'a [u8]>, e: &BytesStart<'a>) -> Result<()> {
    reader.read_to_end(e.name()).map_err(GpxError::from)?;
    Ok(())
}

fn parse_bounds(e: &BytesStart<'_>) -> Result<Bounds> {
    let mut bounds = Bounds::default();
    for (name, value) in attributes(e)? {
        match name.as_slice() {
            b"minlat" => bounds.min_lat = value.parse().unwrap_or_default(),
            b"minlon" => bounds.min_lon = value.parse().unwrap_or_default(),
            b"maxlat" => bounds.max_lat = value.parse().unwrap_or_default(),
            b"maxlon" => bounds.max_lon = value.parse().unwrap_or_default(),
            _ => {}
        }
    }
    Ok(bounds)
}

/// Parse an `<author>` element.
fn parse_person<'a>(reader: &mut Reader<&'a [u8]>) -> Result<Person> {
    let mut person = Person::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"name" => person.name = Some(read_text_owned(reader, &e)?),
                b"email" => {
                    person.email = Some(parse_email(&e)?);
                    skip_to_end(reader, &e)?;
                }
                b"link" => person.link = Some(parse_link(&e, reader)?),
                _ => skip(reader, &e)?,
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"email" => person.email = Some(parse_email(&e)?),
                b"link" => person.link = Some(link_from_attributes(&e)?),
                _ => {}
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"author" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
    }

    Ok(person)
}

fn parse_email(e: &BytesStart<'_>) -> Result<Email> {
    let mut email = Email::default();
    for (name, value) in attributes(e)? {
        match name.as_slice() {
            b"id" => email.id = Some(value),
            b"domain" => email.domain = Some(value),
            _ => {}
        }
    }
    Ok(email)
}

fn copyright_from_attributes(e: &BytesStart<'_>) -> Result<Copyright> {
    let mut copyright = Copyright::default();
    for (name, value) in attributes(e)? {
        if name == b"author" {
            copyright.author = value;
        }
    }
    Ok(copyright)
}

/// Parse a `<copyright>` element. The holder is an attribute, year and
/// license are children.
fn parse_copyright<'a>(
    start: &BytesStart<'a>,
    reader: &mut Reader<&'a [u8]>,
) -> Result<Copyright> {
    let mut copyright = copyright_from_attributes(start)?;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"year" => copyright.year = read_text_owned(reader, &e)?.parse().ok(),
                b"license" => copyright.license = Some(read_text_owned(reader, &e)?),
                _ => skip(reader, &e)?,
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"copyright" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
    }

    Ok(copyright)
}

/// Parse a `<rte>` element.
fn parse_route<'a>(reader: &mut Reader<&'a [u8]>) -> Result<Route> {
    let mut route = Route::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"name" => route.name = Some(read_text_owned(reader, &e)?),
                b"cmt" => route.cmt = Some(read_text_owned(reader, &e)?),
                b"desc" => route.desc = Some(read_text_owned(reader, &e)?),
                b"src" => route.src = Some(read_text_owned(reader, &e)?),
                b"link" => route.links.push(parse_link(&e, reader)?),
                b"number" => route.number = read_text_owned(reader, &e)?.parse().ok(),
                b"type" => route.route_type = Some(read_text_owned(reader, &e)?),
                b"extensions" => route.extensions = parse_route_extensions(reader)?,
                b"rtept" => route
                    .points
                    .push(parse_point(&e, reader, parse_rtept_extensions)?),
                _ => skip(reader, &e)?,
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"rtept" => {
                    let (lat, lon) = parse_lat_lon(&e)?;
                    route.points.push(RoutePoint::new(lat, lon));
                }
                b"link" => route.links.push(link_from_attributes(&e)?),
                _ => {}
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"rte" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
    }

    Ok(route)
}

/// Parse a `<trk>` element.
fn parse_track<'a>(reader: &mut Reader<&'a [u8]>) -> Result<Track> {
    let mut track = Track::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"name" => track.name = Some(read_text_owned(reader, &e)?),
                b"cmt" => track.cmt = Some(read_text_owned(reader, &e)?),
                b"desc" => track.desc = Some(read_text_owned(reader, &e)?),
                b"src" => track.src = Some(read_text_owned(reader, &e)?),
                b"link" => track.links.push(parse_link(&e, reader)?),
                b"number" => track.number = read_text_owned(reader, &e)?.parse().ok(),
                b"type" => track.track_type = Some(read_text_owned(reader, &e)?),
                b"extensions" => track.extensions = parse_track_extensions(reader)?,
                b"trkseg" => track.segments.push(parse_segment(reader)?),
                _ => skip(reader, &e)?,
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"trkseg" => track.segments.push(TrackSegment::default()),
                b"link" => track.links.push(link_from_attributes(&e)?),
                _ => {}
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"trk" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
    }

    Ok(track)
}

/// Parse a `<trkseg>` element.
fn parse_segment<'a>(reader: &mut Reader<&'a [u8]>) -> Result<TrackSegment> {
    let mut segment = TrackSegment::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"trkpt" => segment
                    .points
                    .push(parse_point(&e, reader, parse_trkpt_extensions)?),
                b"extensions" => {
                    segment.extensions = Some(Extensions);
                    skip_to_end(reader, &e)?;
                }
                _ => skip(reader, &e)?,
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"trkpt" => {
                    let (lat, lon) = parse_lat_lon(&e)?;
                    segment.points.push(TrackPoint::new(lat, lon));
                }
                b"extensions" => segment.extensions = Some(Extensions),
                _ => {}
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"trkseg" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
    }

    Ok(segment)
}

// ---- vendor extension blocks ----
//
// Each parser below runs inside a point/route/track `<extensions>` wrapper
// and looks for the one vendor record that wrapper may carry. Anything
// else in the wrapper is out-of-schema content and is skipped; a wrapper
// with no recognized record decodes to `None`.

/// A nested opaque `<Extensions>`/`<extensions>` marker inside a Garmin
/// record.
fn parse_nested_marker<'a>(
    reader: &mut Reader<&'a [u8]>,
    e: &BytesStart<'a>,
) -> Result<Option<Extensions>> {
    skip_to_end(reader, e)?;
    Ok(Some(Extensions))
}

fn parse_wpt_extensions<'a>(reader: &mut Reader<&'a [u8]>) -> Result<Option<WayPointExtension>> {
    let mut found = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if e.local_name().as_ref() == b"WaypointExtension" {
                    found = Some(parse_waypoint_extension(&e, reader)?);
                } else {
                    skip(reader, &e)?;
                }
            }
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"WaypointExtension" {
                    found = Some(WayPointExtension::default());
                }
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"extensions" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
    }

    Ok(found)
}

fn parse_waypoint_extension<'a>(
    start: &BytesStart<'a>,
    reader: &mut Reader<&'a [u8]>,
) -> Result<WayPointExtension> {
    let mut ext = WayPointExtension::default();
    let end_name = start.name().0.to_vec();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"Proximity" => ext.proximity = read_text_owned(reader, &e)?.parse().ok(),
                b"Temperature" => ext.temperature = read_text_owned(reader, &e)?.parse().ok(),
                b"Depth" => ext.depth = read_text_owned(reader, &e)?.parse().ok(),
                b"DisplayMode" => {
                    ext.display_mode = Some(DisplayMode::new(read_text_owned(reader, &e)?))
                }
                b"Categories" => ext.categories = parse_categories(&e, reader)?,
                b"Address" => ext.address = Some(parse_address(&e, reader)?),
                b"PhoneNumber" => ext.phone_numbers.push(parse_phone_number(&e, reader)?),
                b"Samples" => ext.samples = read_text_owned(reader, &e)?.parse().ok(),
                b"Expiration" => ext.expiration = Some(read_text_owned(reader, &e)?),
                _ => skip(reader, &e)?,
            },
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"PhoneNumber" {
                    let mut phone = PhoneNumber::default();
                    for (name, value) in attributes(&e)? {
                        if name == b"Category" {
                            phone.category = Some(value);
                        }
                    }
                    ext.phone_numbers.push(phone);
                }
            }
            Ok(Event::End(e)) if e.name().0 == end_name.as_slice() => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
    }

    Ok(ext)
}

fn parse_categories<'a>(
    start: &BytesStart<'a>,
    reader: &mut Reader<&'a [u8]>,
) -> Result<Vec<String>> {
    let mut categories = Vec::new();
    let end_name = start.name().0.to_vec();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if e.local_name().as_ref() == b"Category" {
                    categories.push(read_text_owned(reader, &e)?);
                } else {
                    skip(reader, &e)?;
                }
            }
            Ok(Event::End(e)) if e.name().0 == end_name.as_slice() => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
    }

    Ok(categories)
}

fn parse_address<'a>(
    start: &BytesStart<'a>,
    reader: &mut Reader<&'a [u8]>,
) -> Result<Address> {
    let mut address = Address::default();
    let end_name = start.name().0.to_vec();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"StreetAddress" => address.street_address.push(read_text_owned(reader, &e)?),
                b"City" => address.city = Some(read_text_owned(reader, &e)?),
                b"State" => address.state = Some(read_text_owned(reader, &e)?),
                b"Country" => address.country = Some(read_text_owned(reader, &e)?),
                b"PostalCode" => address.postal_code = Some(read_text_owned(reader, &e)?),
                b"Extensions" | b"extensions" => {
                    address.extensions = parse_nested_marker(reader, &e)?
                }
                _ => skip(reader, &e)?,
            },
            Ok(Event::Empty(e)) => {
                if matches!(e.local_name().as_ref(), b"Extensions" | b"extensions") {
                    address.extensions = Some(Extensions);
                }
            }
            Ok(Event::End(e)) if e.name().0 == end_name.as_slice() => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
    }

    Ok(address)
}

/// The published schema stores the number as text content; some producers
/// wrap it in a `<Number>` child instead. Accept both.
fn parse_phone_number<'a>(
    start: &BytesStart<'a>,
    reader: &mut Reader<&'a [u8]>,
) -> Result<PhoneNumber> {
    let mut phone = PhoneNumber::default();
    for (name, value) in attributes(start)? {
        if name == b"Category" {
            phone.category = Some(value);
        }
    }
    let end_name = start.name().0.to_vec();

    loop {
        match reader.read_event() {
            Ok(Event::Text(t)) => {
                let raw = std::str::from_utf8(t.as_ref()).unwrap_or_default();
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    phone.number = Some(trimmed.to_string());
                }
            }
            Ok(Event::Start(e)) => {
                if e.local_name().as_ref() == b"Number" {
                    phone.number = Some(read_text_owned(reader, &e)?);
                } else {
                    skip(reader, &e)?;
                }
            }
            Ok(Event::End(e)) if e.name().0 == end_name.as_slice() => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
    }

    Ok(phone)
}

fn parse_route_extensions<'a>(reader: &mut Reader<&'a [u8]>) -> Result<Option<RouteExtension>> {
    let mut found = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if e.local_name().as_ref() == b"RouteExtension" {
                    found = Some(parse_route_extension(&e, reader)?);
                } else {
                    skip(reader, &e)?;
                }
            }
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"RouteExtension" {
                    found = Some(RouteExtension::default());
                }
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"extensions" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
    }

    Ok(found)
}

fn parse_route_extension<'a>(
    start: &BytesStart<'a>,
    reader: &mut Reader<&'a [u8]>,
) -> Result<RouteExtension> {
    let mut ext = RouteExtension::default();
    let end_name = start.name().0.to_vec();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"IsAutoNamed" => ext.is_auto_named = parse_bool(&read_text_owned(reader, &e)?),
                b"DisplayColor" => {
                    ext.display_color = Some(DisplayColor::new(read_text_owned(reader, &e)?))
                }
                b"Extensions" | b"extensions" => ext.extensions = parse_nested_marker(reader, &e)?,
                _ => skip(reader, &e)?,
            },
            Ok(Event::Empty(e)) => {
                if matches!(e.local_name().as_ref(), b"Extensions" | b"extensions") {
                    ext.extensions = Some(Extensions);
                }
            }
            Ok(Event::End(e)) if e.name().0 == end_name.as_slice() => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
    }

    Ok(ext)
}

fn parse_rtept_extensions<'a>(
    reader: &mut Reader<&'a [u8]>,
) -> Result<Option<RoutePointExtension>> {
    let mut found = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if e.local_name().as_ref() == b"RoutePointExtension" {
                    found = Some(parse_route_point_extension(&e, reader)?);
                } else {
                    skip(reader, &e)?;
                }
            }
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"RoutePointExtension" {
                    found = Some(RoutePointExtension::default());
                }
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"extensions" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
    }

    Ok(found)
}

fn parse_route_point_extension<'a>(
    start: &BytesStart<'a>,
    reader: &mut Reader<&'a [u8]>,
) -> Result<RoutePointExtension> {
    let mut ext = RoutePointExtension::default();
    let end_name = start.name().0.to_vec();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"Subclass" => ext.subclass = Some(read_text_owned(reader, &e)?),
                b"rpt" => ext.auto_route_point = Some(parse_auto_route_point(&e, reader)?),
                b"Extensions" | b"extensions" => ext.extensions = parse_nested_marker(reader, &e)?,
                _ => skip(reader, &e)?,
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"rpt" => {
                    let (lat, lon) = parse_lat_lon(&e)?;
                    ext.auto_route_point = Some(AutoRoutePoint {
                        lat,
                        lon,
                        subclass: None,
                    });
                }
                b"Extensions" | b"extensions" => ext.extensions = Some(Extensions),
                _ => {}
            },
            Ok(Event::End(e)) if e.name().0 == end_name.as_slice() => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
    }

    Ok(ext)
}

fn parse_auto_route_point<'a>(
    start: &BytesStart<'a>,
    reader: &mut Reader<&'a [u8]>,
) -> Result<AutoRoutePoint> {
    let (lat, lon) = parse_lat_lon(start)?;
    let mut rpt = AutoRoutePoint {
        lat,
        lon,
        subclass: None,
    };
    let end_name = start.name().0.to_vec();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if e.local_name().as_ref() == b"Subclass" {
                    rpt.subclass = Some(read_text_owned(reader, &e)?);
                } else {
                    skip(reader, &e)?;
                }
            }
            Ok(Event::End(e)) if e.name().0 == end_name.as_slice() => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
    }

    Ok(rpt)
}

fn parse_track_extensions<'a>(reader: &mut Reader<&'a [u8]>) -> Result<Option<TrackExtension>> {
    let mut found = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if e.local_name().as_ref() == b"TrackExtension" {
                    found = Some(parse_track_extension(&e, reader)?);
                } else {
                    skip(reader, &e)?;
                }
            }
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"TrackExtension" {
                    found = Some(TrackExtension::default());
                }
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"extensions" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
    }

    Ok(found)
}

fn parse_track_extension<'a>(
    start: &BytesStart<'a>,
    reader: &mut Reader<&'a [u8]>,
) -> Result<TrackExtension> {
    let mut ext = TrackExtension::default();
    let end_name = start.name().0.to_vec();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"DisplayColor" => {
                    ext.display_color = Some(DisplayColor::new(read_text_owned(reader, &e)?))
                }
                b"Extensions" | b"extensions" => ext.extensions = parse_nested_marker(reader, &e)?,
                _ => skip(reader, &e)?,
            },
            Ok(Event::Empty(e)) => {
                if matches!(e.local_name().as_ref(), b"Extensions" | b"extensions") {
                    ext.extensions = Some(Extensions);
                }
            }
            Ok(Event::End(e)) if e.name().0 == end_name.as_slice() => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
    }

    Ok(ext)
}

fn parse_trkpt_extensions<'a>(
    reader: &mut Reader<&'a [u8]>,
) -> Result<Option<TrackPointExtension>> {
    let mut found = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if e.local_name().as_ref() == b"TrackPointExtension" {
                    found = Some(parse_track_point_extension(&e, reader)?);
                } else {
                    skip(reader, &e)?;
                }
            }
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"TrackPointExtension" {
                    found = Some(TrackPointExtension::default());
                }
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"extensions" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
    }

    Ok(found)
}

/// The TrackPointExtension v1 schema uses lowercase names (`atemp`, `hr`);
/// the older GpxExtensions v3 record spells them `Temperature`/`Depth`.
/// One decode path accepts both.
fn parse_track_point_extension<'a>(
    start: &BytesStart<'a>,
    reader: &mut Reader<&'a [u8]>,
) -> Result<TrackPointExtension> {
    let mut ext = TrackPointExtension::default();
    let end_name = start.name().0.to_vec();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"atemp" | b"Temperature" => {
                    ext.air_temperature = read_text_owned(reader, &e)?.parse().ok()
                }
                b"wtemp" => ext.water_temperature = read_text_owned(reader, &e)?.parse().ok(),
                b"depth" | b"Depth" => ext.depth = read_text_owned(reader, &e)?.parse().ok(),
                b"hr" => ext.heart_rate = read_text_owned(reader, &e)?.parse().ok(),
                b"cad" => ext.cadence = read_text_owned(reader, &e)?.parse().ok(),
                b"extensions" | b"Extensions" => ext.extensions = parse_nested_marker(reader, &e)?,
                _ => skip(reader, &e)?,
            },
            Ok(Event::Empty(e)) => {
                if matches!(e.local_name().as_ref(), b"Extensions" | b"extensions") {
                    ext.extensions = Some(Extensions);
                }
            }
            Ok(Event::End(e)) if e.name().0 == end_name.as_slice() => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
    }

    Ok(ext)
}

/// Read text content of an element as an owned String.
/// Handles regular text, CDATA sections, and entity references.
fn read_text_owned<'a>(
    reader: &mut Reader<&'a [u8]>,
    start: &BytesStart<'_>,
) -> Result<String> {
    let end_name = start.name().0.to_vec();
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Text(e)) => {
                let raw = std::str::from_utf8(e.as_ref()).unwrap_or_default();
                text.push_str(raw);
            }
            Ok(Event::CData(e)) => {
                let s = std::str::from_utf8(e.as_ref()).unwrap_or_default();
                text.push_str(s);
            }
            Ok(Event::GeneralRef(e)) => {
                // Character references (&#60; &#x3C;) and predefined entities
                if let Ok(Some(ch)) = e.resolve_char_ref() {
                    text.push(ch);
                } else {
                    let name = std::str::from_utf8(e.as_ref()).unwrap_or_default();
                    match name {
                        "amp" => text.push('&'),
                        "lt" => text.push('<'),
                        "gt" => text.push('>'),
                        "quot" => text.push('"'),
                        "apos" => text.push('\''),
                        _ => {} // unknown entity, skip
                    }
                }
            }
            Ok(Event::End(e)) if e.name().0 == end_name.as_slice() => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
    }

    Ok(text)
}
