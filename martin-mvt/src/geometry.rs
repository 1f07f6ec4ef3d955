use std::iter::once;

use geo_types::{Coord, Geometry, LineString, Polygon};
use geozero::mvt::tile::GeomType;
use tracing::warn;

use crate::cursor::Cursor;
use crate::{Extent, MvtError, MvtResult};

/// Human-readable name of a geometry kind, used in errors and logs.
#[must_use]
pub fn geometry_kind(geom: &Geometry) -> &'static str {
    match geom {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}

/// Encodes a single (non-collection) geometry into an MVT command stream.
///
/// One [`Cursor`] is shared by every part of the geometry, so the first `MoveTo`
/// of a ring or line continues from where the previous part ended.
pub fn encode_geometry(geom: &Geometry, extent: &Extent) -> MvtResult<(Vec<u32>, GeomType)> {
    let mut cursor = Cursor::new();
    let mut out = Vec::new();

    let geom_type = match geom {
        Geometry::Point(p) => {
            cursor.move_to(extent, [p.0], &mut out)?;
            GeomType::Point
        }
        Geometry::MultiPoint(points) => {
            cursor.move_to(extent, points.0.iter().map(|p| p.0), &mut out)?;
            GeomType::Point
        }
        Geometry::LineString(line) => {
            encode_line(&mut cursor, extent, &line.0, &mut out)?;
            GeomType::Linestring
        }
        Geometry::MultiLineString(lines) => {
            for line in lines {
                encode_line(&mut cursor, extent, &line.0, &mut out)?;
            }
            GeomType::Linestring
        }
        Geometry::Polygon(polygon) => {
            encode_polygon(&mut cursor, extent, polygon, &mut out)?;
            GeomType::Polygon
        }
        Geometry::MultiPolygon(polygons) => {
            for polygon in polygons {
                encode_polygon(&mut cursor, extent, polygon, &mut out)?;
            }
            GeomType::Polygon
        }
        Geometry::Line(_)
        | Geometry::Rect(_)
        | Geometry::Triangle(_)
        | Geometry::GeometryCollection(_) => {
            let kind = geometry_kind(geom);
            warn!("Unable to encode {kind} geometry {geom:?}");
            return Err(MvtError::UnsupportedGeometryKind(kind));
        }
    };

    Ok((out, geom_type))
}

fn encode_line(
    cursor: &mut Cursor,
    extent: &Extent,
    points: &[Coord],
    out: &mut Vec<u32>,
) -> MvtResult<()> {
    if let Some((first, rest)) = points.split_first() {
        cursor.move_to(extent, [*first], out)?;
        cursor.line_to(extent, rest.iter().copied(), out)?;
    }
    Ok(())
}

fn encode_polygon(
    cursor: &mut Cursor,
    extent: &Extent,
    polygon: &Polygon,
    out: &mut Vec<u32>,
) -> MvtResult<()> {
    for ring in once(polygon.exterior()).chain(polygon.interiors()) {
        encode_ring(cursor, extent, ring, out)?;
    }
    Ok(())
}

/// The closing coordinate of a ring is implied by `ClosePath` and never emitted.
fn encode_ring(
    cursor: &mut Cursor,
    extent: &Extent,
    ring: &LineString,
    out: &mut Vec<u32>,
) -> MvtResult<()> {
    let points = match ring.0.as_slice() {
        [] => return Ok(()),
        [open @ .., last] if open.first() == Some(last) => open,
        all => all,
    };
    encode_line(cursor, extent, points, out)?;
    out.push(cursor.close_path());
    Ok(())
}

#[cfg(test)]
mod tests {
    use geo_types::{
        GeometryCollection, Line, MultiLineString, MultiPoint, MultiPolygon, Point, Rect, coord,
        line_string, point, polygon,
    };
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::commands::{Command, CommandInteger};

    fn encode(geom: impl Into<Geometry>) -> (Vec<u32>, GeomType) {
        encode_geometry(&geom.into(), &Extent::default()).unwrap()
    }

    #[test]
    fn test_point_encoding() {
        assert_eq!(
            encode(point! { x: 25., y: 17. }),
            (vec![9, 50, 34], GeomType::Point)
        );
    }

    #[test]
    fn test_multipoint_encoding() {
        let points = MultiPoint::from(vec![(5., 7.), (3., 2.)]);
        assert_eq!(encode(points), (vec![17, 10, 14, 3, 9], GeomType::Point));
    }

    #[test]
    fn test_linestring_encoding() {
        let line = line_string![(x: 2., y: 2.), (x: 2., y: 10.), (x: 10., y: 10.)];
        assert_eq!(
            encode(line),
            (vec![9, 4, 4, 18, 0, 16, 16, 0], GeomType::Linestring)
        );
    }

    #[test]
    fn test_linestring_header_counts() {
        let line = line_string![(x: 0., y: 0.), (x: 10., y: 0.), (x: 10., y: 10.)];
        let (seq, geom_type) = encode(line);
        assert_eq!(geom_type, GeomType::Linestring);
        assert_eq!(CommandInteger(seq[0]).id(), Command::MoveTo as u32);
        assert_eq!(CommandInteger(seq[0]).count(), 1);
        assert_eq!(CommandInteger(seq[3]).id(), Command::LineTo as u32);
        assert_eq!(CommandInteger(seq[3]).count(), 2);
        assert_eq!(seq, vec![9, 0, 0, 18, 20, 0, 0, 20]);
    }

    #[test]
    fn test_multilinestring_carries_cursor() {
        let lines = MultiLineString::new(vec![
            line_string![(x: 2., y: 2.), (x: 2., y: 10.), (x: 10., y: 10.)],
            line_string![(x: 1., y: 1.), (x: 3., y: 5.)],
        ]);
        assert_eq!(
            encode(lines),
            (
                vec![9, 4, 4, 18, 0, 16, 16, 0, 9, 17, 17, 10, 4, 8],
                GeomType::Linestring
            )
        );
    }

    #[test]
    fn test_polygon_encoding() {
        let poly = polygon![(x: 3., y: 6.), (x: 8., y: 12.), (x: 20., y: 34.), (x: 3., y: 6.)];
        assert_eq!(
            encode(poly),
            (vec![9, 6, 12, 18, 10, 12, 24, 44, 15], GeomType::Polygon)
        );
    }

    #[test]
    fn test_square_has_single_close_path() {
        let poly = polygon![(x: 0., y: 0.), (x: 10., y: 0.), (x: 10., y: 10.), (x: 0., y: 10.)];
        let (seq, _) = encode(poly);
        assert_eq!(seq, vec![9, 0, 0, 26, 20, 0, 0, 20, 19, 0, 15]);
        let close = CommandInteger(*seq.last().unwrap());
        assert_eq!(close.id(), Command::ClosePath as u32);
        assert_eq!(close.count(), 1);
        assert_eq!(seq.iter().filter(|v| **v == 15).count(), 1);
    }

    #[test]
    fn test_multipolygon_carries_cursor() {
        let polygons = MultiPolygon::new(vec![
            polygon![(x: 0., y: 0.), (x: 10., y: 0.), (x: 10., y: 10.), (x: 0., y: 10.)],
            polygon!(
                exterior: [(x: 11., y: 11.), (x: 20., y: 11.), (x: 20., y: 20.), (x: 11., y: 20.)],
                interiors: [[(x: 13., y: 13.), (x: 13., y: 17.), (x: 17., y: 17.), (x: 17., y: 13.)]],
            ),
        ]);
        assert_eq!(
            encode(polygons),
            (
                vec![
                    9, 0, 0, 26, 20, 0, 0, 20, 19, 0, 15, 9, 22, 2, 26, 18, 0, 0, 18, 17, 0, 15,
                    9, 4, 13, 26, 0, 8, 8, 0, 0, 7, 15
                ],
                GeomType::Polygon
            )
        );
    }

    #[test]
    fn test_empty_parts_emit_nothing() {
        assert_eq!(
            encode(LineString::<f64>::new(vec![])),
            (vec![], GeomType::Linestring)
        );
        assert_eq!(encode(MultiPoint::<f64>::new(vec![])), (vec![], GeomType::Point));
    }

    #[rstest]
    #[case::line(Line::new(coord! { x: 0., y: 0. }, coord! { x: 1., y: 1. }).into(), "Line")]
    #[case::rect(Rect::new(coord! { x: 0., y: 0. }, coord! { x: 1., y: 1. }).into(), "Rect")]
    #[case::collection(
        Geometry::GeometryCollection(GeometryCollection(vec![Point::new(1., 1.).into()])),
        "GeometryCollection"
    )]
    fn test_unsupported_kinds(#[case] geom: Geometry, #[case] kind: &'static str) {
        assert_eq!(
            encode_geometry(&geom, &Extent::default()),
            Err(MvtError::UnsupportedGeometryKind(kind))
        );
    }
}
