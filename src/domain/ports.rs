use crate::domain::model::NodeId;
use crate::utils::error::Result;

/// Byte-level persistence for snapshot files.
pub trait Storage: Clone + Send + Sync + 'static {
    fn read_file(
        &self,
        path: &str,
    ) -> impl std::future::Future<Output = Result<Option<Vec<u8>>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn bind_address(&self) -> &str;
    fn data_path(&self) -> &str;
    fn request_timeout_seconds(&self) -> u64;
    fn min_password_length(&self) -> usize;
    fn session_ttl_minutes(&self) -> u64;
}

/// Lookup capability the tier classifier depends on.
pub trait NodeLookup {
    /// Returns the supplier of the node called `name`, or `NotFound` if no
    /// node carries that name.
    fn supplier_of(&self, name: &str) -> Result<Option<NodeId>>;
}
