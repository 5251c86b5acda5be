pub(crate) fn u8_from_hex(value: &str) -> Result<u8, std::num::ParseIntError> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    u8::from_str_radix(digits, 16)
}

#[cfg(test)]
mod test {
    use super::u8_from_hex;

    #[test]
    fn parses_with_and_without_prefix() {
        assert_eq!(u8_from_hex("0x4A"), Ok(0x4A));
        assert_eq!(u8_from_hex("0X48"), Ok(0x48));
        assert_eq!(u8_from_hex("4b"), Ok(0x4B));
        assert!(u8_from_hex("0x100").is_err());
        assert!(u8_from_hex("zz").is_err());
    }
}
