use std::fs;
use std::io::BufWriter;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::StoreError;

/// JSON-объект, который пишем/читаем целиком
pub type JsonMap = Map<String, Value>;

/// Сохраняет объект в файл: ключи отсортированы, отступ 2 пробела.
/// Существующий файл перезаписывается.
pub fn save_json(data: &JsonMap, path: impl AsRef<Path>) -> Result<(), StoreError> {
    let path = path.as_ref();

    let file = fs::File::create(path).map_err(|e| StoreError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;

    // Map без preserve_order это BTreeMap => ключи уже по порядку
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)?;

    writer.into_inner().map_err(|e| StoreError::Write {
        path: path.to_path_buf(),
        source: e.into_error(),
    })?;

    Ok(())
}

/// Читает объект из файла.
///
/// `Ok(None)` если файл не открылся или не прочитался (нет кэша),
/// ошибка если содержимое не JSON-объект.
pub fn read_json(path: impl AsRef<Path>) -> Result<Option<JsonMap>, StoreError> {
    let path = path.as_ref();

    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(_) => return Ok(None),
    };

    let value: Value = serde_json::from_str(&text).map_err(|e| StoreError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;

    match value {
        Value::Object(map) => Ok(Some(map)),
        _ => Err(StoreError::NotAnObject {
            path: path.to_path_buf(),
        }),
    }
}
