//! Variant dispatch: turning `name/arg/...` records into effects
//!
//! Each effect validates its own arity and argument types here. A name that
//! belongs to the other pass (or to no pass at all) yields `Ok(None)` so the
//! caller can leave the variant in place.

use crate::color::{named_color, parse_color, parse_palette_coord};
use crate::error::UserError;
use crate::models::Variant;

use super::types::{orientation_code, ColorSpec, GeometricEffect, PixelEffect, META_LIMIT};

/// Parse a variant belonging to the geometric pass.
pub fn parse_geometric(variant: &Variant) -> Result<Option<GeometricEffect>, UserError> {
    match variant.name.as_str() {
        "displace" | "disp" => parse_displace(&variant.arguments).map(Some),
        "unit" => Ok(Some(GeometricEffect::Unit)),
        name => Ok(orientation_code(name).map(GeometricEffect::Face)),
    }
}

/// Parse a variant belonging to the pixel pass.
pub fn parse_pixel(variant: &Variant) -> Result<Option<PixelEffect>, UserError> {
    let args = &variant.arguments;
    let effect = match variant.name.as_str() {
        "meta" | "m" => PixelEffect::Meta { level: parse_meta_level(args)? },
        "clean" | "cl" => {
            expect_no_arguments("clean", args)?;
            PixelEffect::Clean
        }
        "color" | "c" => PixelEffect::Color(parse_color_spec(args)?),
        "inactive" | "in" => {
            expect_no_arguments("inactive", args)?;
            PixelEffect::Inactive
        }
        "property" | "prop" => {
            expect_no_arguments("property", args)?;
            PixelEffect::Property
        }
        "noun" | "unprop" => {
            expect_no_arguments("noun", args)?;
            PixelEffect::Noun
        }
        "gs" | "gscale" | "grayscale" => {
            expect_no_arguments("grayscale", args)?;
            PixelEffect::Grayscale
        }
        _ => return Ok(None),
    };
    Ok(Some(effect))
}

fn parse_displace(args: &[String]) -> Result<GeometricEffect, UserError> {
    let [x, y, z] = args else {
        return Err(UserError::argument(
            "Need 3 numeric arguments for displacement (one for each axis).",
        ));
    };
    let parse = |s: &String| {
        s.trim().parse::<f64>().map_err(|_| {
            UserError::argument("All arguments for displacement need to be numeric!")
        })
    };
    let (dx, dy, dz) = (parse(x)?, parse(y)?, parse(z)?);
    if !(dx.is_finite() && dy.is_finite() && dz.is_finite()) {
        return Err(UserError::argument("Displacement must be a finite number."));
    }
    Ok(GeometricEffect::Displace { dx, dy, dz })
}

fn parse_meta_level(args: &[String]) -> Result<u32, UserError> {
    let level = match args {
        [] => 1,
        [level] => level
            .trim()
            .parse::<i64>()
            .map_err(|_| UserError::argument("Meta level must be an integer!"))?,
        _ => return Err(UserError::argument("Meta takes at most one argument (the level).")),
    };
    if level < 1 {
        return Err(UserError::range("Meta level must be positive!"));
    }
    if level > META_LIMIT as i64 {
        return Err(UserError::range(format!("Meta level can't be greater than {}!", META_LIMIT)));
    }
    Ok(level as u32)
}

fn parse_color_spec(args: &[String]) -> Result<ColorSpec, UserError> {
    let spec = match args {
        [spec] => spec.trim(),
        [x, y] => {
            return Err(UserError::argument(format!(
                "Color takes one argument. Did you mean `c/{},{}`?",
                x, y
            )))
        }
        _ => return Err(UserError::argument("Color takes exactly one argument.")),
    };

    if spec.starts_with('#') {
        return parse_color(spec)
            .map(ColorSpec::Rgba)
            .map_err(|e| UserError::argument(format!("Invalid color `{}`: {}", spec, e)));
    }
    if let Some((x, y)) = parse_palette_coord(spec).or_else(|| named_color(spec)) {
        return Ok(ColorSpec::Palette(x, y));
    }
    Err(UserError::argument(format!("I don't know the color `{}`.", spec)))
}

fn expect_no_arguments(name: &str, args: &[String]) -> Result<(), UserError> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(UserError::argument(format!("`{}` doesn't take any arguments.", name)))
    }
}
