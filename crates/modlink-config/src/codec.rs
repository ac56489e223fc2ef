//! Binary encode/decode for the durable configuration store
//! (`spec.md` §6 "Configuration store format").
//!
//! Every multi-byte integer is big-endian, matching the module-file wire
//! format's convention (`spec.md` §4.5) even though the store format
//! itself only specifies field order, not byte order; we follow the
//! codec's lead rather than introduce a second endianness convention in
//! the same project.

use crate::error::{ConfigError, Result};
use crate::types::{Configuration, ContextRecord, ModuleEntry};
use modlink_core::ModuleId;
use std::io::{Read, Write};

const MAGIC: u32 = 0x4D4C_4346; // "MLCF"
const FILE_TYPE: u16 = 1;
const MAJOR: u16 = 1;
const MINOR: u16 = 0;

fn write_u16(w: &mut impl Write, v: u16) -> Result<()> {
    w.write_all(&v.to_be_bytes())
        .map_err(|e| ConfigError::io("<store>", e))
}

fn write_u32(w: &mut impl Write, v: u32) -> Result<()> {
    w.write_all(&v.to_be_bytes())
        .map_err(|e| ConfigError::io("<store>", e))
}

fn write_str(w: &mut impl Write, s: &str) -> Result<()> {
    let bytes = s.as_bytes();
    write_u16(w, bytes.len() as u16)?;
    w.write_all(bytes).map_err(|e| ConfigError::io("<store>", e))
}

fn write_opt_str(w: &mut impl Write, s: Option<&str>) -> Result<()> {
    match s {
        Some(s) => {
            w.write_all(&[1]).map_err(|e| ConfigError::io("<store>", e))?;
            write_str(w, s)
        }
        None => w.write_all(&[0]).map_err(|e| ConfigError::io("<store>", e)),
    }
}

fn write_module_id(w: &mut impl Write, id: &ModuleId) -> Result<()> {
    write_str(w, id.name())?;
    write_opt_str(w, id.version().map(ToString::to_string).as_deref())
}

fn read_u16(r: &mut impl Read) -> Result<u16> {
    let mut buf = [0u8; 2];
    r.read_exact(&mut buf)
        .map_err(|_| ConfigError::Truncated("u16"))?;
    Ok(u16::from_be_bytes(buf))
}

fn read_u32(r: &mut impl Read) -> Result<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)
        .map_err(|_| ConfigError::Truncated("u32"))?;
    Ok(u32::from_be_bytes(buf))
}

fn read_str(r: &mut impl Read, field: &'static str) -> Result<String> {
    let len = read_u16(r)? as usize;
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)
        .map_err(|_| ConfigError::Truncated(field))?;
    String::from_utf8(buf).map_err(|_| ConfigError::InvalidUtf8(field))
}

fn read_opt_str(r: &mut impl Read, field: &'static str) -> Result<Option<String>> {
    let mut tag = [0u8; 1];
    r.read_exact(&mut tag)
        .map_err(|_| ConfigError::Truncated(field))?;
    if tag[0] == 0 {
        Ok(None)
    } else {
        Ok(Some(read_str(r, field)?))
    }
}

fn read_module_id(r: &mut impl Read) -> Result<ModuleId> {
    let name = read_str(r, "module id name")?;
    match read_opt_str(r, "module id version")? {
        None => Ok(ModuleId::new(name)),
        Some(v) => {
            let version = semver::Version::parse(&v)
                .map_err(|_| ConfigError::InvalidUtf8("module id version"))?;
            Ok(ModuleId::versioned(name, version))
        }
    }
}

/// Serialize `cfg` to the durable store's wire format.
pub fn write_configuration(w: &mut impl Write, cfg: &Configuration) -> Result<()> {
    write_u32(w, MAGIC)?;
    write_u16(w, FILE_TYPE)?;
    write_u16(w, MAJOR)?;
    write_u16(w, MINOR)?;

    write_u16(w, cfg.root_ids().len() as u16)?;
    for id in cfg.root_ids() {
        write_module_id(w, id)?;
    }

    write_u16(w, cfg.contexts().len() as u16)?;
    for ctx in cfg.contexts() {
        write_str(w, ctx.canonical_name())?;

        write_u16(w, ctx.modules().len() as u16)?;
        for m in ctx.modules() {
            write_module_id(w, &m.id)?;
            write_opt_str(w, m.library_path.as_deref())?;
        }

        write_u16(w, ctx.local_classes().len() as u16)?;
        for (class_name, module_id) in ctx.local_classes() {
            write_str(w, class_name)?;
            write_module_id(w, module_id)?;
        }

        write_u16(w, ctx.remote_packages().len() as u16)?;
        for (package, context_name) in ctx.remote_packages() {
            write_str(w, package)?;
            write_str(w, context_name)?;
        }
    }

    Ok(())
}

/// Parse a configuration from the durable store's wire format.
pub fn read_configuration(r: &mut impl Read) -> Result<Configuration> {
    let magic = read_u32(r)?;
    if magic != MAGIC {
        return Err(ConfigError::BadMagic(format!("{magic:#010x}")));
    }
    let _file_type = read_u16(r)?;
    let major = read_u16(r)?;
    let _minor = read_u16(r)?;
    if major > MAJOR {
        return Err(ConfigError::UnsupportedVersion {
            found: major,
            supported: MAJOR,
        });
    }

    let root_count = read_u16(r)?;
    let mut root_ids = Vec::with_capacity(root_count as usize);
    for _ in 0..root_count {
        root_ids.push(read_module_id(r)?);
    }

    let context_count = read_u16(r)?;
    let mut contexts = Vec::with_capacity(context_count as usize);
    for _ in 0..context_count {
        let canonical_name = read_str(r, "context canonical name")?;

        let module_count = read_u16(r)?;
        let mut modules = Vec::with_capacity(module_count as usize);
        for _ in 0..module_count {
            let id = read_module_id(r)?;
            let library_path = read_opt_str(r, "library path")?;
            modules.push(ModuleEntry { id, library_path });
        }

        let local_class_count = read_u16(r)?;
        let mut local_classes = Vec::with_capacity(local_class_count as usize);
        for _ in 0..local_class_count {
            let class_name = read_str(r, "local class name")?;
            let module_id = read_module_id(r)?;
            local_classes.push((class_name, module_id));
        }

        let remote_package_count = read_u16(r)?;
        let mut remote_packages = Vec::with_capacity(remote_package_count as usize);
        for _ in 0..remote_package_count {
            let package = read_str(r, "remote package name")?;
            let context_name = read_str(r, "remote package context name")?;
            remote_packages.push((package, context_name));
        }

        contexts.push(ContextRecord::new(
            canonical_name,
            modules,
            local_classes,
            remote_packages,
        ));
    }

    Ok(Configuration::new(root_ids, contexts))
}
