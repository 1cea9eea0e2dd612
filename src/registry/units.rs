use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::shared::types::Dimension;

/// One canonical unit: its dimension, its ratio to the dimension's base unit
/// and the Unicode form shown to users.
///
/// Ratios are stored as units-per-base (`value_in_unit = value_in_base *
/// ratio`), so the base unit of every dimension carries `ratio = 1.0`.
/// Temperature is additive and its ratio field is never consulted.
#[derive(Debug, Clone, Copy)]
pub struct UnitDef {
    pub code: &'static str,
    pub dimension: Dimension,
    pub ratio: f64,
    pub display: &'static str,
}

macro_rules! unit {
    ($code:literal, $dim:ident, $ratio:expr, $display:literal) => {
        UnitDef {
            code: $code,
            dimension: Dimension::$dim,
            ratio: $ratio,
            display: $display,
        }
    };
}

/// Every canonical unit. Case is significant: `nm` is nanometer, `Nm` is
/// newton-meter.
pub static UNIT_DEFS: &[UnitDef] = &[
    // Length (base: meter)
    unit!("m", Length, 1.0, "m"),
    unit!("cm", Length, 100.0, "cm"),
    unit!("mm", Length, 1000.0, "mm"),
    unit!("um", Length, 1e6, "µm"),
    unit!("nm", Length, 1e9, "nm"),
    unit!("km", Length, 1e-3, "km"),
    unit!("in", Length, 1.0 / 0.0254, "in"),
    unit!("ft", Length, 1.0 / 0.3048, "ft"),
    unit!("yd", Length, 1.0 / 0.9144, "yd"),
    unit!("mi", Length, 1.0 / 1609.344, "mi"),
    // Weight (base: kilogram)
    unit!("kg", Weight, 1.0, "kg"),
    unit!("g", Weight, 1000.0, "g"),
    unit!("mg", Weight, 1e6, "mg"),
    unit!("t", Weight, 1e-3, "t"),
    unit!("lb", Weight, 1.0 / 0.453_592_37, "lb"),
    unit!("oz", Weight, 1.0 / 0.028_349_523_125, "oz"),
    // Temperature (additive, handled in the converter)
    unit!("c", Temperature, 1.0, "°C"),
    unit!("f", Temperature, 1.0, "°F"),
    unit!("k", Temperature, 1.0, "K"),
    // Volume (base: liter)
    unit!("l", Volume, 1.0, "L"),
    unit!("ml", Volume, 1000.0, "mL"),
    unit!("gal", Volume, 1.0 / 3.785_411_784, "gal"),
    unit!("qt", Volume, 1.0 / 0.946_352_946, "qt"),
    unit!("pt", Volume, 1.0 / 0.473_176_473, "pt"),
    unit!("cup", Volume, 1.0 / 0.236_588_236_5, "cup"),
    unit!("floz", Volume, 1.0 / 0.029_573_529_562_5, "fl oz"),
    unit!("tbsp", Volume, 1.0 / 0.014_786_764_781_25, "tbsp"),
    unit!("tsp", Volume, 1.0 / 0.004_928_921_593_75, "tsp"),
    // Area (base: square meter)
    unit!("m2", Area, 1.0, "m²"),
    unit!("cm2", Area, 1e4, "cm²"),
    unit!("mm2", Area, 1e6, "mm²"),
    unit!("km2", Area, 1e-6, "km²"),
    unit!("in2", Area, 1.0 / 0.000_645_16, "in²"),
    unit!("ft2", Area, 1.0 / 0.092_903_04, "ft²"),
    unit!("yd2", Area, 1.0 / 0.836_127_36, "yd²"),
    unit!("acre", Area, 1.0 / 4046.856_422_4, "acre"),
    unit!("ha", Area, 1e-4, "ha"),
    // Speed (base: meter per second)
    unit!("ms", Speed, 1.0, "m/s"),
    unit!("kmh", Speed, 3.6, "km/h"),
    unit!("mph", Speed, 1.0 / 0.447_04, "mph"),
    unit!("fts", Speed, 1.0 / 0.3048, "ft/s"),
    unit!("kn", Speed, 3600.0 / 1852.0, "kn"),
    unit!("mach", Speed, 1.0 / 343.0, "Mach"),
    // Acceleration (base: meter per second squared)
    unit!("ms2", Acceleration, 1.0, "m/s²"),
    unit!("fts2", Acceleration, 1.0 / 0.3048, "ft/s²"),
    unit!("gforce", Acceleration, 1.0 / 9.806_65, "g"),
    // Flow rate (base: liter per minute)
    unit!("lmin", FlowRate, 1.0, "L/min"),
    unit!("mls", FlowRate, 1000.0 / 60.0, "mL/s"),
    unit!("m3h", FlowRate, 0.06, "m³/h"),
    unit!("galmin", FlowRate, 1.0 / 3.785_411_784, "gal/min"),
    unit!("cfm", FlowRate, 1.0 / 28.316_846_592, "CFM"),
    unit!("cfs", FlowRate, 1.0 / (28.316_846_592 * 60.0), "CFS"),
    // Torque (base: newton-meter; uppercase N is part of the canonical code)
    unit!("Nm", Torque, 1.0, "N⋅m"),
    unit!("lbft", Torque, 1.0 / 1.355_817_948_331_400_4, "lb⋅ft"),
    unit!("lbin", Torque, 1.0 / 0.112_984_829_027_616_7, "lb⋅in"),
    unit!("kgm", Torque, 1.0 / 9.806_65, "kgf⋅m"),
    unit!("ozin", Torque, 16.0 / 0.112_984_829_027_616_7, "oz⋅in"),
    // Pressure (base: pascal)
    unit!("pa", Pressure, 1.0, "Pa"),
    unit!("kpa", Pressure, 1e-3, "kPa"),
    unit!("mpa", Pressure, 1e-6, "MPa"),
    unit!("bar", Pressure, 1e-5, "bar"),
    unit!("mbar", Pressure, 1e-2, "mbar"),
    unit!("psi", Pressure, 1.0 / 6894.757_293_168_361, "psi"),
    unit!("atm", Pressure, 1.0 / 101_325.0, "atm"),
    unit!("mmhg", Pressure, 1.0 / 133.322_387_415, "mmHg"),
    unit!("inhg", Pressure, 1.0 / 3386.389, "inHg"),
    unit!("torr", Pressure, 760.0 / 101_325.0, "Torr"),
    unit!("psf", Pressure, 1.0 / 47.880_258_980_335_84, "psf"),
];

pub static UNITS: Lazy<HashMap<&'static str, &'static UnitDef>> =
    Lazy::new(|| UNIT_DEFS.iter().map(|def| (def.code, def)).collect());

/// Surface form → canonical code. Keys are lowercase with single internal
/// spaces; `canonicalize` normalizes input the same way before the lookup.
///
/// Bare `nm` resolves to nanometer; newton-meter is only reachable through
/// the separator and long forms (the detector handles the uppercase-N
/// surface forms directly).
pub static ALIASES: &[(&str, &str)] = &[
    // Length
    ("m", "m"),
    ("meter", "m"),
    ("meters", "m"),
    ("metre", "m"),
    ("metres", "m"),
    ("cm", "cm"),
    ("centimeter", "cm"),
    ("centimeters", "cm"),
    ("centimetre", "cm"),
    ("centimetres", "cm"),
    ("mm", "mm"),
    ("millimeter", "mm"),
    ("millimeters", "mm"),
    ("millimetre", "mm"),
    ("millimetres", "mm"),
    ("um", "um"),
    ("µm", "um"),
    ("micron", "um"),
    ("microns", "um"),
    ("micrometer", "um"),
    ("micrometers", "um"),
    ("micrometre", "um"),
    ("micrometres", "um"),
    ("nm", "nm"),
    ("nanometer", "nm"),
    ("nanometers", "nm"),
    ("nanometre", "nm"),
    ("nanometres", "nm"),
    ("km", "km"),
    ("kilometer", "km"),
    ("kilometers", "km"),
    ("kilometre", "km"),
    ("kilometres", "km"),
    ("in", "in"),
    ("inch", "in"),
    ("inches", "in"),
    ("\"", "in"),
    ("ft", "ft"),
    ("foot", "ft"),
    ("feet", "ft"),
    ("'", "ft"),
    ("yd", "yd"),
    ("yard", "yd"),
    ("yards", "yd"),
    ("mi", "mi"),
    ("mile", "mi"),
    ("miles", "mi"),
    // Weight
    ("kg", "kg"),
    ("kilogram", "kg"),
    ("kilograms", "kg"),
    ("g", "g"),
    ("gram", "g"),
    ("grams", "g"),
    ("mg", "mg"),
    ("milligram", "mg"),
    ("milligrams", "mg"),
    ("t", "t"),
    ("tonne", "t"),
    ("tonnes", "t"),
    ("metric ton", "t"),
    ("metric tons", "t"),
    ("lb", "lb"),
    ("lbs", "lb"),
    ("pound", "lb"),
    ("pounds", "lb"),
    ("oz", "oz"),
    ("ounce", "oz"),
    ("ounces", "oz"),
    // Temperature
    ("c", "c"),
    ("°c", "c"),
    ("celsius", "c"),
    ("centigrade", "c"),
    ("f", "f"),
    ("°f", "f"),
    ("fahrenheit", "f"),
    ("k", "k"),
    ("°k", "k"),
    ("kelvin", "k"),
    // Volume
    ("l", "l"),
    ("liter", "l"),
    ("liters", "l"),
    ("litre", "l"),
    ("litres", "l"),
    ("ml", "ml"),
    ("milliliter", "ml"),
    ("milliliters", "ml"),
    ("millilitre", "ml"),
    ("millilitres", "ml"),
    ("gal", "gal"),
    ("gallon", "gal"),
    ("gallons", "gal"),
    ("qt", "qt"),
    ("quart", "qt"),
    ("quarts", "qt"),
    ("pt", "pt"),
    ("pint", "pt"),
    ("pints", "pt"),
    ("cup", "cup"),
    ("cups", "cup"),
    ("floz", "floz"),
    ("fl oz", "floz"),
    ("fl. oz", "floz"),
    ("fluid ounce", "floz"),
    ("fluid ounces", "floz"),
    ("tbsp", "tbsp"),
    ("tablespoon", "tbsp"),
    ("tablespoons", "tbsp"),
    ("tsp", "tsp"),
    ("teaspoon", "tsp"),
    ("teaspoons", "tsp"),
    // Area
    ("m2", "m2"),
    ("m²", "m2"),
    ("sq m", "m2"),
    ("sqm", "m2"),
    ("square meter", "m2"),
    ("square meters", "m2"),
    ("square metre", "m2"),
    ("square metres", "m2"),
    ("cm2", "cm2"),
    ("cm²", "cm2"),
    ("square centimeter", "cm2"),
    ("square centimeters", "cm2"),
    ("mm2", "mm2"),
    ("mm²", "mm2"),
    ("square millimeter", "mm2"),
    ("square millimeters", "mm2"),
    ("km2", "km2"),
    ("km²", "km2"),
    ("sq km", "km2"),
    ("square kilometer", "km2"),
    ("square kilometers", "km2"),
    ("in2", "in2"),
    ("in²", "in2"),
    ("sq in", "in2"),
    ("square inch", "in2"),
    ("square inches", "in2"),
    ("ft2", "ft2"),
    ("ft²", "ft2"),
    ("sq ft", "ft2"),
    ("sqft", "ft2"),
    ("square foot", "ft2"),
    ("square feet", "ft2"),
    ("yd2", "yd2"),
    ("yd²", "yd2"),
    ("sq yd", "yd2"),
    ("square yard", "yd2"),
    ("square yards", "yd2"),
    ("acre", "acre"),
    ("acres", "acre"),
    ("ha", "ha"),
    ("hectare", "ha"),
    ("hectares", "ha"),
    // Speed ("ms" the canonical code stays out of the surface vocabulary:
    // bare "ms" in prose is milliseconds, not meters per second)
    ("m/s", "ms"),
    ("mps", "ms"),
    ("meters per second", "ms"),
    ("metres per second", "ms"),
    ("kmh", "kmh"),
    ("km/h", "kmh"),
    ("kph", "kmh"),
    ("kilometers per hour", "kmh"),
    ("kilometres per hour", "kmh"),
    ("mph", "mph"),
    ("miles per hour", "mph"),
    ("fts", "fts"),
    ("ft/s", "fts"),
    ("fps", "fts"),
    ("feet per second", "fts"),
    ("kn", "kn"),
    ("kt", "kn"),
    ("kts", "kn"),
    ("knot", "kn"),
    ("knots", "kn"),
    ("mach", "mach"),
    // Acceleration
    ("ms2", "ms2"),
    ("m/s2", "ms2"),
    ("m/s²", "ms2"),
    ("meters per second squared", "ms2"),
    ("fts2", "fts2"),
    ("ft/s2", "fts2"),
    ("ft/s²", "fts2"),
    ("feet per second squared", "fts2"),
    ("gforce", "gforce"),
    ("g-force", "gforce"),
    ("g force", "gforce"),
    // Flow rate
    ("lmin", "lmin"),
    ("l/min", "lmin"),
    ("lpm", "lmin"),
    ("liters per minute", "lmin"),
    ("litres per minute", "lmin"),
    ("mls", "mls"),
    ("ml/s", "mls"),
    ("milliliters per second", "mls"),
    ("m3h", "m3h"),
    ("m3/h", "m3h"),
    ("m³/h", "m3h"),
    ("cubic meters per hour", "m3h"),
    ("galmin", "galmin"),
    ("gal/min", "galmin"),
    ("gpm", "galmin"),
    ("gallons per minute", "galmin"),
    ("cfm", "cfm"),
    ("cubic feet per minute", "cfm"),
    ("cfs", "cfs"),
    ("cubic feet per second", "cfs"),
    // Torque (bare "nm" is taken by nanometer above)
    ("n·m", "Nm"),
    ("n⋅m", "Nm"),
    ("n.m", "Nm"),
    ("n-m", "Nm"),
    ("n m", "Nm"),
    ("newton meter", "Nm"),
    ("newton meters", "Nm"),
    ("newton metre", "Nm"),
    ("newton metres", "Nm"),
    ("newton-meter", "Nm"),
    ("newton-meters", "Nm"),
    ("lbft", "lbft"),
    ("lb·ft", "lbft"),
    ("lb⋅ft", "lbft"),
    ("lb.ft", "lbft"),
    ("lb-ft", "lbft"),
    ("lb ft", "lbft"),
    ("ft·lb", "lbft"),
    ("ft⋅lb", "lbft"),
    ("ft-lb", "lbft"),
    ("ft lb", "lbft"),
    ("foot pound", "lbft"),
    ("foot pounds", "lbft"),
    ("pound feet", "lbft"),
    ("pound foot", "lbft"),
    ("lbin", "lbin"),
    ("lb·in", "lbin"),
    ("lb⋅in", "lbin"),
    ("lb.in", "lbin"),
    ("lb-in", "lbin"),
    ("lb in", "lbin"),
    ("inch pound", "lbin"),
    ("inch pounds", "lbin"),
    ("kgm", "kgm"),
    ("kg·m", "kgm"),
    ("kg⋅m", "kgm"),
    ("kg.m", "kgm"),
    ("kg-m", "kgm"),
    ("kgf·m", "kgm"),
    ("kgf⋅m", "kgm"),
    ("kgf.m", "kgm"),
    ("kgf-m", "kgm"),
    ("kgfm", "kgm"),
    ("kgf m", "kgm"),
    ("ozin", "ozin"),
    ("oz·in", "ozin"),
    ("oz⋅in", "ozin"),
    ("oz.in", "ozin"),
    ("oz-in", "ozin"),
    ("oz in", "ozin"),
    ("ounce inch", "ozin"),
    ("ounce inches", "ozin"),
    // Pressure
    ("pa", "pa"),
    ("pascal", "pa"),
    ("pascals", "pa"),
    ("kpa", "kpa"),
    ("kilopascal", "kpa"),
    ("kilopascals", "kpa"),
    ("mpa", "mpa"),
    ("megapascal", "mpa"),
    ("megapascals", "mpa"),
    ("bar", "bar"),
    ("bars", "bar"),
    ("mbar", "mbar"),
    ("millibar", "mbar"),
    ("millibars", "mbar"),
    ("psi", "psi"),
    ("pounds per square inch", "psi"),
    ("atm", "atm"),
    ("atmosphere", "atm"),
    ("atmospheres", "atm"),
    ("mmhg", "mmhg"),
    ("inhg", "inhg"),
    ("torr", "torr"),
    ("psf", "psf"),
    ("pounds per square foot", "psf"),
];

pub static ALIAS_MAP: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| ALIASES.iter().copied().collect());

/// Default display unit per dimension (the metric preset's choices).
pub fn default_unit(dimension: Dimension) -> &'static str {
    match dimension {
        Dimension::Length => "m",
        Dimension::Weight => "kg",
        Dimension::Temperature => "c",
        Dimension::Volume => "l",
        Dimension::Area => "m2",
        Dimension::Speed => "kmh",
        Dimension::Acceleration => "ms2",
        Dimension::FlowRate => "lmin",
        Dimension::Torque => "Nm",
        Dimension::Pressure => "kpa",
        Dimension::Timezone => "auto",
        Dimension::Currency => "USD",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_code_has_one_definition() {
        assert_eq!(UNITS.len(), UNIT_DEFS.len(), "duplicate unit code");
    }

    #[test]
    fn alias_targets_are_canonical() {
        for (alias, canonical) in ALIASES {
            assert!(
                UNITS.contains_key(canonical),
                "alias {:?} points at unknown unit {:?}",
                alias,
                canonical
            );
        }
    }

    #[test]
    fn base_units_have_unit_ratio() {
        for base in ["m", "kg", "l", "m2", "ms", "ms2", "lmin", "Nm", "pa"] {
            assert_eq!(UNITS[base].ratio, 1.0, "base unit {} must have ratio 1", base);
        }
    }

    #[test]
    fn nm_case_is_significant() {
        assert_eq!(UNITS["nm"].dimension, Dimension::Length);
        assert_eq!(UNITS["Nm"].dimension, Dimension::Torque);
    }
}
