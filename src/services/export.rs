//! 结果落盘：日线 CSV、综合信息 JSON 及简化 CSV

use crate::errors::Result;
use crate::models::bar::DailyBar;
use crate::models::info::StockInfo;
use log::info;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// 确保输出文件所在目录存在
fn ensure_output_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// 将日线数据按 (symbol, date) 升序排序后写出 CSV，返回写出的行数
pub fn write_daily_csv(path: &Path, bars: &mut Vec<DailyBar>) -> Result<usize> {
    bars.sort_by(|a, b| a.symbol.cmp(&b.symbol).then(a.date.cmp(&b.date)));

    ensure_output_dir(path)?;
    let mut writer = csv::Writer::from_path(path)?;
    for bar in bars.iter() {
        writer.serialize(bar)?;
    }
    writer.flush()?;

    info!("已写出: {}  （共 {} 行）", path.display(), bars.len());
    Ok(bars.len())
}

/// 写出综合信息的详细 JSON
pub fn write_info_json(path: &Path, infos: &[StockInfo]) -> Result<()> {
    ensure_output_dir(path)?;
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, infos)?;
    info!("已写出详细数据: {}", path.display());
    Ok(())
}

/// 写出综合信息的简化 CSV（中文列名）
pub fn write_info_csv(path: &Path, infos: &[StockInfo]) -> Result<()> {
    ensure_output_dir(path)?;
    let mut file = File::create(path)?;
    // Excel 需要 BOM 才能识别 UTF-8 编码的中文列名
    file.write_all("\u{FEFF}".as_bytes())?;
    let mut writer = csv::Writer::from_writer(file);
    for stock_info in infos {
        writer.serialize(stock_info.summary_row())?;
    }
    writer.flush()?;
    info!("已写出简化CSV: {}", path.display());
    Ok(())
}
