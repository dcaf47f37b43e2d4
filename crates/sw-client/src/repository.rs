use tokio::runtime::{Builder, Runtime};

use sw_core::{Id, Password, Record, RecordRepository, RepositoryResult, Username};

use crate::{ClientConfig, ClientError, ClientResult, RecordClient};

/// Blocking [`RecordRepository`] backed by [`RecordClient`].
///
/// Owns a current-thread runtime and drives each request to completion, so it
/// must not be used from inside another async runtime.
#[derive(Debug)]
pub struct HttpRecordRepository {
    runtime: Runtime,
    client: RecordClient,
}

impl HttpRecordRepository {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ClientError::Runtime)?;
        let client = RecordClient::new(config)?;
        Ok(Self { runtime, client })
    }

    pub fn client(&self) -> &RecordClient {
        &self.client
    }
}

impl RecordRepository for HttpRecordRepository {
    fn login(&mut self, username: &Username, password: &Password) -> RepositoryResult<()> {
        let client = &mut self.client;
        Ok(self.runtime.block_on(client.login(username, password))?)
    }

    fn logout(&mut self) -> RepositoryResult<()> {
        let client = &mut self.client;
        Ok(self.runtime.block_on(client.logout())?)
    }

    fn list(&self) -> RepositoryResult<Vec<Record>> {
        Ok(self.runtime.block_on(self.client.list_records())?)
    }

    fn create(&self, record: &Record) -> RepositoryResult<()> {
        Ok(self.runtime.block_on(self.client.create_record(record))?)
    }

    fn delete(&self, id: Id) -> RepositoryResult<()> {
        Ok(self.runtime.block_on(self.client.delete_record(id))?)
    }
}
