use std::path::Path;

use tokio::{
    fs::File,
    io::{self, AsyncBufReadExt, BufReader, Split},
};

/// Read a file from the given path into a list of byte lines, without requiring UTF-8.
/// Line endings (`\n` or `\r\n`) are stripped.
pub async fn read_lines(path: impl AsRef<Path>) -> io::Result<Vec<Vec<u8>>> {
    let mut r = file_reader(path).await?;
    let mut lines = Vec::new();

    while let Some(mut line) = r.next_segment().await? {
        if line.last() == Some(&b'\r') {
            line.pop();
        }

        lines.push(line);
    }

    Ok(lines)
}

async fn file_reader(path: impl AsRef<Path>) -> io::Result<Split<BufReader<File>>> {
    let f = File::open(path).await?;

    Ok(BufReader::new(f).split(b'\n'))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn reads_lines_as_bytes() {
        let path = std::env::temp_dir().join(format!(
            "hashtag-sentiment-lines-{}.txt",
            std::process::id()
        ));
        std::fs::write(&path, b"one\r\ntwo \xff\nthree").expect("write lines");

        let lines = read_lines(&path).await.expect("lines read");

        assert_eq!(
            lines,
            vec![b"one".to_vec(), b"two \xff".to_vec(), b"three".to_vec()]
        );

        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn missing_files_are_not_found() {
        let result = read_lines("/definitely/not/here.txt").await;

        assert_eq!(
            result.map_err(|e| e.kind()).unwrap_err(),
            io::ErrorKind::NotFound
        );
    }
}
