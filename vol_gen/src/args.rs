//! Argument parsing and validation
//! Uses library `clap`

use std::ffi::OsStr;

use clap::{Arg, Command, ValueHint};

// up to 32bit value
pub fn is_positive_number(num: &str) -> Result<(), String> {
    let n = num.parse::<u32>();
    match n {
        Ok(n) => {
            if n > 0 {
                Ok(())
            } else {
                Err("Number must be greater than 0".into())
            }
        }
        Err(_) => Err("Number required".into()),
    }
}

// scanner range, matches the transfer function editor
pub fn is_intensity(num: &str) -> Result<(), String> {
    let n = num.parse::<i16>();
    match n {
        Ok(n) => {
            if (-3071..=3071).contains(&n) {
                Ok(())
            } else {
                Err("Intensity must be in range <-3071;3071>".into())
            }
        }
        Err(_) => Err("Signed 16bit number required".into()),
    }
}

const GENERATOR_NAMES: &[&str] = &["solid", "gradient", "shapes"];

pub fn get_command<'a>() -> Command<'a> {
    Command::new("vol_gen")
        .version("0.1.0")
        .about("Raw CT-like volume generator, little endian i16 samples")
        .arg(
            Arg::new("dims")
                .help("Dimensions of volume")
                .long("dims")
                .short('d')
                .required(true)
                .number_of_values(3)
                .value_names(&["X", "Y", "Z"])
                .use_value_delimiter(true)
                .require_value_delimiter(true)
                .require_equals(true)
                .validator(is_positive_number),
        )
        .arg(
            Arg::new("generator")
                .help("Type of generator")
                .long("generator")
                .short('g')
                .required(true)
                .requires_ifs(&[
                    ("solid", "sample"),
                    ("gradient", "sample"),
                    ("shapes", "sample"),
                    ("shapes", "n-of-shapes"),
                    ("shapes", "object-size"),
                ])
                .takes_value(true)
                .value_name("NAME")
                .possible_values(GENERATOR_NAMES),
        )
        .arg(
            Arg::new("sample")
                .help("Intensity of generated objects, Hounsfield-like")
                .long("sample")
                .value_name("INTENSITY")
                .allow_hyphen_values(true)
                .validator(is_intensity),
        )
        .arg(
            Arg::new("object-size")
                .help("Size of individual generated objects")
                .long("object-size")
                .value_name("SIDE")
                .validator(is_positive_number),
        )
        .arg(
            Arg::new("n-of-shapes")
                .help("Number of shapes generated in volume")
                .long("n-of-shapes")
                .value_name("N")
                .validator(is_positive_number),
        )
        .arg(
            Arg::new("seed")
                .help("Seed for RNG, leave out for random seed")
                .long("seed")
                .value_name("SEED")
                .validator(is_positive_number),
        )
        .arg(
            Arg::new("output-file")
                .help("File name to output")
                .long("output-file")
                .short('o')
                .value_name("FILE")
                .allow_invalid_utf8(true)
                .value_hint(ValueHint::FilePath)
                .default_value_os(OsStr::new("a.raw")),
        )
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn intensity_validator_bounds() {
        assert!(is_intensity("-3071").is_ok());
        assert!(is_intensity("0").is_ok());
        assert!(is_intensity("3071").is_ok());

        assert!(is_intensity("-3072").is_err());
        assert!(is_intensity("3072").is_err());
        assert!(is_intensity("forty").is_err());
    }

    #[test]
    fn solid_requires_sample() {
        let res = get_command().try_get_matches_from(["vol_gen", "-d=8,8,8", "-g", "solid"]);
        assert!(res.is_err());

        let res = get_command().try_get_matches_from([
            "vol_gen",
            "-d=8,8,8",
            "-g",
            "solid",
            "--sample",
            "300",
        ]);
        assert!(res.is_ok());
    }
}
