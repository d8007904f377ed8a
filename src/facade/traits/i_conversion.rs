use std::io;
use crate::models::conversion::{ConversionInput, ConversionRequest};
use crate::service::job_runner::JobHandle;

// Facade 接口，負責協調轉換流程
pub trait ConversionFacadeTrait: Send + Sync {
    /// 列出候選檔案並建立已驗證的轉換請求
    /// # 參數
    /// - input: 資料夾、來源與目標格式、是否取代原檔
    /// # 回傳
    /// - 成功時返回轉換請求，驗證失敗時返回包含 ValidationError 的 IO 錯誤
    fn prepare_request(&self, input: ConversionInput) -> io::Result<ConversionRequest>;

    /// 驗證請求並在背景開始轉換
    /// # 參數
    /// - request: 轉換請求，會再次驗證
    /// # 回傳
    /// - 成功時返回 JobHandle，驗證失敗或已有工作執行中時返回 IO 錯誤
    fn start_job(&self, request: ConversionRequest) -> io::Result<JobHandle>;

    /// prepare_request 與 start_job 的組合
    fn start_conversion(&self, input: ConversionInput) -> io::Result<JobHandle> {
        let request = self.prepare_request(input)?;
        self.start_job(request)
    }
}
