//! Protobuf file helpers: binary wire format and pretty-printed JSON.

use std::fs;
use std::path::Path;

use prost::Message;
use serde::Serialize;

use crate::Result;

/// Writes a protobuf message to a file in binary wire format.
pub fn write_protobuf_to_binary_file<M: Message>(message: &M, path: impl AsRef<Path>) -> Result<()> {
    fs::write(path, message.encode_to_vec())?;
    Ok(())
}

/// Reads a protobuf message back from a binary file.
pub fn read_protobuf_from_binary_file<M: Message + Default>(path: impl AsRef<Path>) -> Result<M> {
    let data = fs::read(path)?;
    let message = M::decode(data.as_slice())?;
    Ok(message)
}

/// Writes a message to a file as pretty-printed JSON.
pub fn write_protobuf_to_json_file<M: Serialize>(message: &M, path: impl AsRef<Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(message)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::Laptop;
    use crate::sample;

    #[test]
    fn binary_file_round_trip() {
        let folder = tempfile::tempdir().unwrap();
        let path = folder.path().join("laptop.bin");

        let laptop = sample::new_laptop();
        write_protobuf_to_binary_file(&laptop, &path).unwrap();

        let decoded: Laptop = read_protobuf_from_binary_file(&path).unwrap();
        assert_eq!(decoded, laptop);
    }

    #[test]
    fn json_file_carries_the_message() {
        let folder = tempfile::tempdir().unwrap();
        let path = folder.path().join("laptop.json");

        let laptop = sample::new_laptop();
        write_protobuf_to_json_file(&laptop, &path).unwrap();

        let json = fs::read_to_string(&path).unwrap();
        assert!(json.contains(&laptop.id));
    }
}
