// 出力先の具象実装

use crate::core::{DistanceError, DistanceRow, DistanceWriter, PipelineResult};
use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::Mutex as AsyncMutex;

/// メモリ内保存の出力実装（テスト用および開発用）
/// Cloneしたインスタンス間でデータを共有する
#[derive(Debug, Clone, Default)]
pub struct MemoryDistanceWriter {
    batches: Arc<Mutex<Vec<Vec<DistanceRow>>>>,
    finalized: Arc<Mutex<bool>>,
}

impl MemoryDistanceWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// テスト用：書き込まれた全行を到着順で取得
    pub fn rows(&self) -> Vec<DistanceRow> {
        self.batches.lock().unwrap().iter().flatten().cloned().collect()
    }

    /// テスト用：各書き込み操作の行数
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().unwrap().iter().map(Vec::len).collect()
    }

    /// テスト用：書き込み操作の回数
    pub fn batch_count(&self) -> usize {
        self.batches.lock().unwrap().len()
    }

    /// テスト用：完了状態を確認
    pub fn is_finalized(&self) -> bool {
        *self.finalized.lock().unwrap()
    }
}

#[async_trait]
impl DistanceWriter for MemoryDistanceWriter {
    async fn write_batch(&self, rows: &[DistanceRow]) -> Result<()> {
        if self.is_finalized() {
            anyhow::bail!("完了済みの出力先には書き込めません");
        }
        self.batches
            .lock()
            .map_err(|_| anyhow::anyhow!("出力バッファのロックに失敗しました"))?
            .push(rows.to_vec());
        Ok(())
    }

    async fn finalize(&self) -> Result<()> {
        *self
            .finalized
            .lock()
            .map_err(|_| anyhow::anyhow!("完了フラグのロックに失敗しました"))? = true;
        Ok(())
    }

    fn target(&self) -> String {
        "memory".to_string()
    }
}

/// CSVファイルへの出力実装
///
/// ファイルは`create`の時点で作成（切り詰め）されるため、作成できない出力先は
/// 計算開始前に検出される。ヘッダー行は書かない。
pub struct CsvDistanceWriter {
    file_path: PathBuf,
    writer: AsyncMutex<Option<BufWriter<File>>>,
    rows_written: AtomicUsize,
}

impl CsvDistanceWriter {
    pub async fn create<P: AsRef<Path>>(file_path: P) -> PipelineResult<Self> {
        let file_path = file_path.as_ref().to_path_buf();
        let file = File::create(&file_path)
            .await
            .map_err(|e| DistanceError::output_write(file_path.display().to_string(), e))?;

        Ok(Self {
            file_path,
            writer: AsyncMutex::new(Some(BufWriter::new(file))),
            rows_written: AtomicUsize::new(0),
        })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written.load(Ordering::Relaxed)
    }
}

/// バッチをCSVとしてエンコード
pub fn encode_rows(rows: &[DistanceRow]) -> Result<Vec<u8>> {
    let mut encoder = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::with_capacity(rows.len() * 24));

    for row in rows {
        encoder.serialize(row)?;
    }

    encoder
        .into_inner()
        .map_err(|e| anyhow::anyhow!("CSVエンコードエラー: {}", e.error()))
}

#[async_trait]
impl DistanceWriter for CsvDistanceWriter {
    async fn write_batch(&self, rows: &[DistanceRow]) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }

        let encoded = encode_rows(rows)?;

        let mut guard = self.writer.lock().await;
        let writer = guard
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("出力ファイルは既に閉じられています"))?;

        writer
            .write_all(&encoded)
            .await
            .map_err(|e| anyhow::anyhow!("書き込みエラー: {e}"))?;
        writer
            .flush()
            .await
            .map_err(|e| anyhow::anyhow!("フラッシュエラー: {e}"))?;

        self.rows_written.fetch_add(rows.len(), Ordering::Relaxed);
        Ok(())
    }

    async fn finalize(&self) -> Result<()> {
        let writer = self.writer.lock().await.take();

        if let Some(mut writer) = writer {
            writer
                .flush()
                .await
                .map_err(|e| anyhow::anyhow!("フラッシュエラー: {e}"))?;
            writer
                .into_inner()
                .sync_all()
                .await
                .map_err(|e| anyhow::anyhow!("同期エラー: {e}"))?;
        }

        Ok(())
    }

    fn target(&self) -> String {
        self.file_path.display().to_string()
    }
}
