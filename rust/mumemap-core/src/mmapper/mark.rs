use super::reader::ByteReader;
use super::room::transcode_uint;
use super::version::{width, FieldKind, FormatVersion};
use super::writer::ByteWriter;
use crate::error::Result;
use crate::models::{InfoMark, MarkClass, MarkPosition, MarkTime, MarkType};

/// Coordinates and rotation are stored in hundredths.
const SCALE: f64 = 100.0;

fn read_position(r: &mut ByteReader<'_>) -> Result<MarkPosition> {
    let x = f64::from(r.read_i32()?) / SCALE;
    let y = f64::from(r.read_i32()?) / SCALE;
    let z = r.read_i32()?;
    Ok(MarkPosition { x, y, z })
}

fn put_position(w: &mut ByteWriter, p: &MarkPosition) {
    w.put_i32(scaled(p.x));
    w.put_i32(scaled(p.y));
    w.put_i32(p.z);
}

fn scaled(v: f64) -> i32 { (v * SCALE).round() as i32 }

pub fn decode_mark(r: &mut ByteReader<'_>, version: FormatVersion) -> Result<InfoMark> {
    let name = r.read_text()?;
    let text = r.read_text()?;
    let time = MarkTime { julian_day: r.read_u32()?, msecs: r.read_u32()?, time_spec: r.read_u8()? };
    let kind = MarkType::from_u8(r.read_u8()?)?;
    let class = MarkClass::from_u8(r.read_uint(width(FieldKind::MarkClass, version))? as u8)?;
    let rotation = match width(FieldKind::MarkRotation, version) {
        0 => 0.0,
        _ => f64::from(r.read_i32()?) / SCALE,
    };
    let pos1 = read_position(r)?;
    let pos2 = read_position(r)?;
    Ok(InfoMark { name, text, time, kind, class, rotation, pos1, pos2 })
}

/// Writes `mark` in the newest layout.
pub fn encode_mark(w: &mut ByteWriter, mark: &InfoMark) {
    w.put_text(mark.name.as_deref());
    w.put_text(mark.text.as_deref());
    w.put_u32(mark.time.julian_day);
    w.put_u32(mark.time.msecs);
    w.put_u8(mark.time.time_spec);
    w.put_u8(mark.kind.to_u8());
    w.put_uint(width(FieldKind::MarkClass, FormatVersion::NEWEST), u32::from(mark.class.to_u8()));
    w.put_i32(scaled(mark.rotation));
    put_position(w, &mark.pos1);
    put_position(w, &mark.pos2);
}

/// Copies one mark record into the newest layout without interpreting it.
pub fn transcode_mark(r: &mut ByteReader<'_>, w: &mut ByteWriter, version: FormatVersion) -> Result<()> {
    w.put_bytes(r.take_text_raw()?); // name
    w.put_bytes(r.take_text_raw()?); // text
    w.put_bytes(r.take(4 + 4 + 1 + 1)?); // julian day, msecs, time spec, type
    transcode_uint(r, w, FieldKind::MarkClass, version)?;
    transcode_uint(r, w, FieldKind::MarkRotation, version)?;
    w.put_bytes(r.take(6 * 4)?); // pos1, pos2
    Ok(())
}
