//! Header codec.
//!
//! Field order is fixed by the file layout and is not self-describing:
//! mode, version, beatmap hash, player name, replay hash, six hit counters,
//! score, max combo, perfect flag, mods.

use std::io::Write;

use tracing::trace;

use crate::codec::bytes::{
    ByteBuffer, write_bool, write_i32, write_optional_text, write_u8, write_u16, write_u32,
};
use crate::error::Result;
use crate::game::{GameMode, Mods};
use crate::replay::ReplayHeader;

pub fn decode_header(buf: &mut ByteBuffer<'_>) -> Result<ReplayHeader> {
    let mode = GameMode::try_from(buf.read_u8()?)?;
    let version = buf.read_i32()?;
    let beatmap_hash = buf.read_optional_text("beatmap hash")?;
    let player_name = buf.read_optional_text("player name")?;
    let replay_hash = buf.read_optional_text("replay hash")?;

    let header = ReplayHeader {
        mode,
        version,
        beatmap_hash,
        player_name,
        replay_hash,
        count_300: buf.read_u16()?,
        count_100: buf.read_u16()?,
        count_50: buf.read_u16()?,
        count_geki: buf.read_u16()?,
        count_katu: buf.read_u16()?,
        count_miss: buf.read_u16()?,
        score: buf.read_u32()?,
        max_combo: buf.read_u16()?,
        perfect: buf.read_bool()?,
        mods: Mods::from_raw(buf.read_u32()?)?,
    };

    trace!(
        "Decoded header: mode={}, version={}, player={:?}, mods={}",
        header.mode, header.version, header.player_name, header.mods
    );
    Ok(header)
}

pub fn encode_header<W: Write + ?Sized>(w: &mut W, header: &ReplayHeader) -> Result<()> {
    write_u8(w, header.mode.as_u8())?;
    write_i32(w, header.version)?;
    write_optional_text(w, header.beatmap_hash.as_deref())?;
    write_optional_text(w, header.player_name.as_deref())?;
    write_optional_text(w, header.replay_hash.as_deref())?;
    write_u16(w, header.count_300)?;
    write_u16(w, header.count_100)?;
    write_u16(w, header.count_50)?;
    write_u16(w, header.count_geki)?;
    write_u16(w, header.count_katu)?;
    write_u16(w, header.count_miss)?;
    write_u32(w, header.score)?;
    write_u16(w, header.max_combo)?;
    write_bool(w, header.perfect)?;
    write_u32(w, header.mods.bits())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn sample_header() -> ReplayHeader {
        ReplayHeader {
            mode: GameMode::Taiko,
            version: 20240123,
            beatmap_hash: Some("d41d8cd98f00b204e9800998ecf8427e".to_string()),
            player_name: Some("Cookiezi".to_string()),
            replay_hash: Some("0cc175b9c0f1b6a831c399e269772661".to_string()),
            count_300: 1200,
            count_100: 35,
            count_50: 2,
            count_geki: 300,
            count_katu: 20,
            count_miss: 1,
            score: 3_456_789_012,
            max_combo: 1800,
            perfect: false,
            mods: Mods::HIDDEN | Mods::HARD_ROCK,
        }
    }

    #[test]
    fn test_header_round_trip() {
        let header = sample_header();
        let mut out = Vec::new();
        encode_header(&mut out, &header).unwrap();

        let mut buf = ByteBuffer::new(&out);
        let decoded = decode_header(&mut buf).unwrap();
        assert_eq!(decoded, header);
        assert!(buf.is_exhausted());
    }

    #[test]
    fn test_header_byte_layout() {
        let header = ReplayHeader {
            mode: GameMode::Mania,
            version: 1,
            count_300: 0x0102,
            score: 0x0A0B0C0D,
            perfect: true,
            mods: Mods::NO_FAIL,
            ..Default::default()
        };
        let mut out = Vec::new();
        encode_header(&mut out, &header).unwrap();

        assert_eq!(out[0], 3);
        assert_eq!(&out[1..5], &[1, 0, 0, 0]);
        // three absent text fields
        assert_eq!(&out[5..8], &[0, 0, 0]);
        assert_eq!(&out[8..10], &[0x02, 0x01]);
        assert_eq!(&out[20..24], &[0x0D, 0x0C, 0x0B, 0x0A]);
        assert_eq!(out[26], 1);
        assert_eq!(&out[27..31], &[1, 0, 0, 0]);
        assert_eq!(out.len(), 31);
    }

    #[test]
    fn test_invalid_game_mode() {
        let mut out = Vec::new();
        encode_header(&mut out, &sample_header()).unwrap();
        out[0] = 4;

        let err = decode_header(&mut ByteBuffer::new(&out)).unwrap_err();
        assert!(matches!(err, Error::InvalidGameMode(4)));
    }

    #[test]
    fn test_unknown_mod_bit_is_rejected() {
        let mut out = Vec::new();
        encode_header(&mut out, &sample_header()).unwrap();
        let len = out.len();
        out[len - 1] = 0x80;

        let err = decode_header(&mut ByteBuffer::new(&out)).unwrap_err();
        assert!(matches!(err, Error::InvalidModifiers(_)));
    }

    #[test]
    fn test_truncated_header() {
        let mut out = Vec::new();
        encode_header(&mut out, &sample_header()).unwrap();
        out.truncate(out.len() - 2);

        let err = decode_header(&mut ByteBuffer::new(&out)).unwrap_err();
        assert!(matches!(err, Error::TruncatedInput { .. }));
    }
}
