use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

pub fn remove_file(path: &Path) -> Result<()> {
    std::fs::remove_file(path).map_err(|e| Error::io(path, e))
}

pub fn remove_dir(path: &Path) -> Result<()> {
    std::fs::remove_dir_all(path).map_err(|e| Error::io(path, e))
}

/// 将 `source` 下的所有条目移动到 `dest` 目录。
///
/// 跨文件系统时 rename 失败（EXDEV），退回为复制后删除源条目。
pub fn move_dir_content(source: &Path, dest: &Path) -> Result<usize> {
    std::fs::create_dir_all(dest).map_err(|e| Error::io(dest, e))?;
    let entries = std::fs::read_dir(source).map_err(|e| Error::io(source, e))?;
    let mut moved = 0usize;
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(source, e))?;
        let target = dest.join(entry.file_name());
        match std::fs::rename(entry.path(), &target) {
            Ok(()) => {}
            Err(e) if is_cross_device(&e) => {
                debug!("{} crosses filesystems, copying", entry.path().display());
                copy_then_remove(&entry.path(), &target)?;
            }
            Err(e) => return Err(Error::io(entry.path(), e)),
        }
        moved += 1;
    }
    Ok(moved)
}

#[cfg(unix)]
fn is_cross_device(e: &std::io::Error) -> bool {
    e.raw_os_error() == Some(nix::errno::Errno::EXDEV as i32)
}

#[cfg(not(unix))]
fn is_cross_device(_: &std::io::Error) -> bool {
    false
}

/// 复制文件或整棵目录到 `target`，成功后删除 `source`
fn copy_then_remove(source: &Path, target: &Path) -> Result<()> {
    copy_tree(source, target)?;
    if source.is_dir() {
        remove_dir(source)
    } else {
        remove_file(source)
    }
}

fn copy_tree(source: &Path, target: &Path) -> Result<()> {
    if !source.is_dir() {
        std::fs::copy(source, target).map_err(|e| Error::io(source, e))?;
        return Ok(());
    }
    std::fs::create_dir_all(target).map_err(|e| Error::io(target, e))?;
    for entry in std::fs::read_dir(source).map_err(|e| Error::io(source, e))? {
        let entry = entry.map_err(|e| Error::io(source, e))?;
        copy_tree(&entry.path(), &target.join(entry.file_name()))?;
    }
    Ok(())
}
