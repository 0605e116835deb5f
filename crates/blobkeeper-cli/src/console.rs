//! Interactive menu loop.
//!
//! One command is read, run to completion (including its log write) and
//! reported before the next prompt. The loop is generic over its input and
//! output so tests drive it with byte buffers.

use std::path::Path;

use blobkeeper_core::app::{BlobService, OperationReport};
use futures::StreamExt;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::CliError;

pub const MENU: &str = "Select an option:\n\
1. List Blobs\n\
2. Upload Blob\n\
3. Download Blob\n\
4. Delete Blob\n\
5. Exit\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    List,
    Upload,
    Download,
    Delete,
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input {
            "1" => Some(MenuChoice::List),
            "2" => Some(MenuChoice::Upload),
            "3" => Some(MenuChoice::Download),
            "4" => Some(MenuChoice::Delete),
            "5" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs until Exit is chosen or input ends.
    pub async fn run(&mut self, service: &BlobService) -> Result<(), CliError> {
        loop {
            self.say(MENU).await?;
            let Some(line) = self.read_line().await? else {
                break;
            };

            let keep_going = match MenuChoice::parse(&line) {
                Some(MenuChoice::List) => self.list(service).await?,
                Some(MenuChoice::Upload) => self.upload(service).await?,
                Some(MenuChoice::Download) => self.download(service).await?,
                Some(MenuChoice::Delete) => self.delete(service).await?,
                Some(MenuChoice::Exit) => false,
                None => {
                    self.say("Invalid option. Please try again.\n").await?;
                    true
                }
            };
            if !keep_going {
                break;
            }
        }
        self.say("Exiting program...\n").await?;
        Ok(())
    }

    async fn list(&mut self, service: &BlobService) -> Result<bool, CliError> {
        self.say("Listing blobs...\n").await?;
        let mut names = service.list().await;
        while let Some(item) = names.next().await {
            match item {
                Ok(name) => self.say(&format!("{name}\n")).await?,
                Err(err) => {
                    self.report(&OperationReport::list_failed(&err)).await?;
                    break;
                }
            }
        }
        Ok(true)
    }

    async fn upload(&mut self, service: &BlobService) -> Result<bool, CliError> {
        let Some(path) = self.prompt("Enter the file path to upload:").await? else {
            return Ok(false);
        };
        let Some(blob) = self.prompt("Enter the blob name:").await? else {
            return Ok(false);
        };
        self.say("Uploading blob...\n").await?;
        let report = service.upload(Path::new(&path), &blob).await;
        self.report(&report).await?;
        Ok(true)
    }

    async fn download(&mut self, service: &BlobService) -> Result<bool, CliError> {
        let Some(blob) = self.prompt("Enter the blob name to download:").await? else {
            return Ok(false);
        };
        let Some(path) = self
            .prompt("Enter the file path to save the downloaded blob:")
            .await?
        else {
            return Ok(false);
        };
        self.say("Downloading blob...\n").await?;
        let report = service.download(&blob, Path::new(&path)).await;
        self.report(&report).await?;
        Ok(true)
    }

    async fn delete(&mut self, service: &BlobService) -> Result<bool, CliError> {
        let Some(blob) = self.prompt("Enter the blob name to delete:").await? else {
            return Ok(false);
        };
        self.say("Deleting blob...\n").await?;
        let report = service.delete(&blob).await;
        self.report(&report).await?;
        Ok(true)
    }

    async fn prompt(&mut self, question: &str) -> Result<Option<String>, CliError> {
        self.say(question).await?;
        self.say("\n").await?;
        self.read_line().await
    }

    async fn report(&mut self, report: &OperationReport) -> Result<(), CliError> {
        self.say(&report.message).await?;
        self.say("\n").await
    }

    /// `None` at end of input. Line terminators are stripped, nothing else.
    async fn read_line(&mut self) -> Result<Option<String>, CliError> {
        let mut buf = String::new();
        if self.input.read_line(&mut buf).await? == 0 {
            return Ok(None);
        }
        let trimmed = buf.trim_end_matches(['\r', '\n']).len();
        buf.truncate(trimmed);
        Ok(Some(buf))
    }

    async fn say(&mut self, text: &str) -> Result<(), CliError> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.flush().await?;
        Ok(())
    }
}
