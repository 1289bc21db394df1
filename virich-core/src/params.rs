/// Parser for inline surface parameter strings such as `a=1.5, b=3, scale=0.2`
/// and sample grid strings such as `30x30` or `30,20`.
use nom::{
    branch::alt,
    character::complete::{alpha1, char, multispace0, u32 as decimal},
    combinator::all_consuming,
    multi::separated_list1,
    number::complete::float,
    sequence::{delimited, separated_pair},
    IResult,
};

use crate::error::ConfigError;
use crate::sampler::SampleGrid;
use crate::surface::SurfaceKind;

/// Parse a comma separated list of `name=value` assignments
pub fn parse_assignments(input: &str) -> Result<Vec<(String, f32)>, ConfigError> {
    match all_consuming(assignments)(input) {
        Ok((_, pairs)) => Ok(pairs
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect()),
        Err(e) => Err(ConfigError::Params {
            input: input.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Parse `TxV` or `T,V` into a sample grid
pub fn parse_grid(input: &str) -> Result<SampleGrid, ConfigError> {
    match all_consuming(grid)(input) {
        Ok((_, (steps_t, steps_v))) => {
            let grid = SampleGrid::new(steps_t, steps_v);
            grid.validate()?;
            Ok(grid)
        }
        Err(e) => Err(ConfigError::Params {
            input: input.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Override surface constants from a parameter string.
///
/// The Virich surface accepts `a`, `b`, `c`, `d` and `scale`; the sphere
/// accepts `radius`. Nothing is written unless every name is known to the
/// surface.
pub fn apply_assignments(surface: &mut SurfaceKind, input: &str) -> Result<(), ConfigError> {
    let mut updated = *surface;
    for (name, value) in parse_assignments(input)? {
        let slot = match (&mut updated, name.as_str()) {
            (SurfaceKind::Virich(p), "a") => &mut p.a,
            (SurfaceKind::Virich(p), "b") => &mut p.b,
            (SurfaceKind::Virich(p), "c") => &mut p.c,
            (SurfaceKind::Virich(p), "d") => &mut p.d,
            (SurfaceKind::Virich(p), "scale") => &mut p.scale,
            (SurfaceKind::Sphere(s), "radius" | "r") => &mut s.radius,
            (kind, _) => {
                return Err(ConfigError::Params {
                    input: input.to_string(),
                    reason: format!("'{}' is not a parameter of the {} surface", name, kind.name()),
                })
            }
        };
        *slot = value;
    }
    *surface = updated;
    Ok(())
}

fn assignment(input: &str) -> IResult<&str, (&str, f32)> {
    separated_pair(
        delimited(multispace0, alpha1, multispace0),
        char('='),
        delimited(multispace0, float, multispace0),
    )(input)
}

fn assignments(input: &str) -> IResult<&str, Vec<(&str, f32)>> {
    separated_list1(char(','), assignment)(input)
}

fn grid(input: &str) -> IResult<&str, (u32, u32)> {
    separated_pair(
        delimited(multispace0, decimal, multispace0),
        alt((char('x'), char(','))),
        delimited(multispace0, decimal, multispace0),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{ShapeParameters, SphereParameters};

    #[test]
    fn test_parse_assignments() {
        let pairs = parse_assignments("a=1.5, b = 3,scale=0.25").unwrap();
        assert_eq!(
            pairs,
            vec![
                ("a".to_string(), 1.5),
                ("b".to_string(), 3.0),
                ("scale".to_string(), 0.25)
            ]
        );
    }

    #[test]
    fn test_parse_assignments_rejects_garbage() {
        assert!(parse_assignments("a=").is_err());
        assert!(parse_assignments("a=1 b=2").is_err());
        assert!(parse_assignments("").is_err());
    }

    #[test]
    fn test_parse_grid() {
        assert_eq!(parse_grid("30x20").unwrap(), SampleGrid::new(30, 20));
        assert_eq!(parse_grid(" 4 , 4 ").unwrap(), SampleGrid::new(4, 4));
        assert!(matches!(
            parse_grid("0x4"),
            Err(ConfigError::Surface(_))
        ));
        assert!(parse_grid("4x").is_err());
    }

    #[test]
    fn test_apply_to_virich() {
        let mut surface = SurfaceKind::default();
        apply_assignments(&mut surface, "c=1,d=2").unwrap();
        assert_eq!(
            surface,
            SurfaceKind::Virich(ShapeParameters {
                c: 1.0,
                d: 2.0,
                ..ShapeParameters::default()
            })
        );
    }

    #[test]
    fn test_apply_rejects_foreign_parameter() {
        let mut surface = SurfaceKind::Sphere(SphereParameters::default());
        apply_assignments(&mut surface, "radius=2").unwrap();
        assert_eq!(surface, SurfaceKind::Sphere(SphereParameters { radius: 2.0 }));

        let err = apply_assignments(&mut surface, "a=2").unwrap_err();
        assert!(err.to_string().contains("sphere"));
    }

    #[test]
    fn test_rejected_override_leaves_surface_untouched() {
        let mut surface = SurfaceKind::default();
        let err = apply_assignments(&mut surface, "a=2,bogus=1").unwrap_err();
        assert!(err.to_string().contains("bogus"));
        assert_eq!(surface, SurfaceKind::default());
    }
}
