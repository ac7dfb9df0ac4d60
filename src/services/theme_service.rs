//! 颜色模式存储

use crate::{
    error::StorageError,
    models::ColorMode,
    storage::{KeyValueStorage, StorageKeys},
};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

pub struct ThemeService {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
    sender: watch::Sender<ColorMode>,
    // toggle 的读-改-写与 set_mode 在本进程内串行执行
    write_lock: Mutex<()>,
}

impl ThemeService {
    /// 创建服务，并以存储中的当前值初始化订阅通道
    pub fn new(storage: Arc<dyn KeyValueStorage>, keys: &StorageKeys) -> Self {
        let key = keys.color_mode.clone();
        let initial = read_mode(storage.as_ref(), &key);
        let (sender, _) = watch::channel(initial);

        Self {
            storage,
            key,
            sender,
            write_lock: Mutex::new(()),
        }
    }

    /// 读取存储中的颜色模式，缺失或无法识别时为 light
    pub fn mode(&self) -> ColorMode {
        read_mode(self.storage.as_ref(), &self.key)
    }

    /// 写入颜色模式并通知订阅者
    pub fn set_mode(&self, mode: ColorMode) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().map_err(|_| StorageError::Poisoned)?;
        self.write_mode(mode)
    }

    /// 切换到相反模式，返回切换后的模式
    pub fn toggle(&self) -> Result<ColorMode, StorageError> {
        let _guard = self.write_lock.lock().map_err(|_| StorageError::Poisoned)?;
        let next = self.mode().opposite();
        self.write_mode(next)?;
        Ok(next)
    }

    fn write_mode(&self, mode: ColorMode) -> Result<(), StorageError> {
        self.storage.set(&self.key, mode.as_str())?;
        self.sender.send_replace(mode);

        tracing::debug!(mode = %mode, "Color mode updated");
        Ok(())
    }

    pub fn subscribe(&self) -> watch::Receiver<ColorMode> {
        self.sender.subscribe()
    }
}

fn read_mode(storage: &dyn KeyValueStorage, key: &str) -> ColorMode {
    match storage.get(key) {
        Ok(Some(token)) => ColorMode::from_token(&token).unwrap_or_else(|| {
            tracing::warn!(key = %key, "Unrecognised color mode in storage, using light");
            ColorMode::default()
        }),
        Ok(None) => ColorMode::default(),
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Failed to read color mode, using light");
            ColorMode::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_defaults_to_light() {
        let storage = Arc::new(MemoryStorage::new());
        let service = ThemeService::new(storage.clone(), &StorageKeys::default());
        assert_eq!(service.mode(), ColorMode::Light);

        storage.set(&StorageKeys::default().color_mode, "sepia").unwrap();
        assert_eq!(service.mode(), ColorMode::Light);
    }

    #[test]
    fn test_toggle_twice_restores() {
        let storage = Arc::new(MemoryStorage::new());
        let service = ThemeService::new(storage, &StorageKeys::default());

        let original = service.mode();
        assert_eq!(service.toggle().unwrap(), original.opposite());
        assert_eq!(service.toggle().unwrap(), original);
        assert_eq!(service.mode(), original);
    }

    #[test]
    fn test_set_mode_survives_reload() {
        let storage = Arc::new(MemoryStorage::new());
        let keys = StorageKeys::default();

        ThemeService::new(storage.clone(), &keys)
            .set_mode(ColorMode::Dark)
            .unwrap();

        let reloaded = ThemeService::new(storage, &keys);
        assert_eq!(reloaded.mode(), ColorMode::Dark);
        assert_eq!(*reloaded.subscribe().borrow(), ColorMode::Dark);
    }

    #[test]
    fn test_subscribers_see_changes() {
        let storage = Arc::new(MemoryStorage::new());
        let service = ThemeService::new(storage, &StorageKeys::default());
        let mut rx = service.subscribe();

        service.set_mode(ColorMode::Dark).unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), ColorMode::Dark);
    }

    #[test]
    fn test_concurrent_toggles_are_not_lost() {
        let storage = Arc::new(MemoryStorage::new());
        let service = Arc::new(ThemeService::new(storage, &StorageKeys::default()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = service.clone();
                std::thread::spawn(move || service.toggle().unwrap())
            })
            .collect();
        let results: Vec<ColorMode> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(results.iter().filter(|m| **m == ColorMode::Dark).count(), 4);
        assert_eq!(service.mode(), ColorMode::Light);
    }
}
