use std::io;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use log::info;
use crate::error::ValidationError;
use crate::facade::traits::i_conversion::ConversionFacadeTrait;
use crate::models::conversion::{ConversionInput, ConversionRequest};
use crate::models::file::FileCollectInput;
use crate::service::job_runner::{JobHandle, JobRunner, JobSlot};
use crate::service::traits::i_service::FileServiceTrait;

pub struct ConversionFacade {
    file_service: Box<dyn FileServiceTrait>,
    runner: Arc<JobRunner>,
    busy: Arc<AtomicBool>,
}

impl ConversionFacade {
    pub fn new(file_service: Box<dyn FileServiceTrait>, runner: JobRunner) -> Self {
        ConversionFacade {
            file_service,
            runner: Arc::new(runner),
            busy: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl ConversionFacadeTrait for ConversionFacade {
    fn prepare_request(&self, input: ConversionInput) -> io::Result<ConversionRequest> {
        // 格式相同時不觸碰檔案系統
        if input.source_format == input.target_format {
            return Err(ValidationError::SameFormat(input.source_format).into());
        }
        if !input.folder.is_dir() {
            return Err(ValidationError::InvalidFolder(input.folder.clone()).into());
        }

        let file_output = self
            .file_service
            .collect_files(FileCollectInput {
                folder: input.folder.clone(),
                format: input.source_format,
            })
            .map_err(|source| ValidationError::ListFolder {
                folder: input.folder.clone(),
                source,
            })?;

        let request = ConversionRequest::new(input, file_output.files);
        request.validate(self.runner.heic_available())?;
        Ok(request)
    }

    fn start_job(&self, request: ConversionRequest) -> io::Result<JobHandle> {
        request.validate(self.runner.heic_available())?;
        let slot = JobSlot::acquire(&self.busy).ok_or(ValidationError::JobInFlight)?;
        info!(
            "啟動背景轉換：{} 個檔案，{} -> {}",
            request.candidate_files.len(),
            request.source_format,
            request.target_format
        );
        self.runner.spawn(request, slot)
    }
}
