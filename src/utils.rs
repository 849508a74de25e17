use rand::Rng;
use sha2::{Digest, Sha256};

/// Genera un salt aleatorio de 16 caracteres hexadecimales
pub fn generar_salt() -> String {
    let mut rng = rand::thread_rng();
    let salt: u64 = rng.gen();
    format!("{:016x}", salt)
}

/// Hash de contraseña con salt usando SHA-256.
/// Retorna el hash en formato hexadecimal
pub fn hash_password(salt: &str, password: &str) -> String {
    let input = format!("{}{}", salt, password);
    let hash = Sha256::digest(input.as_bytes());
    format!("{:x}", hash)
}

/// Token de sesión opaco: 32 caracteres hexadecimales aleatorios
pub fn generar_token() -> String {
    let mut rng = rand::thread_rng();
    let token: u128 = rng.gen();
    format!("{:032x}", token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_es_determinista_por_salt() {
        let h1 = hash_password("abc", "secreto");
        let h2 = hash_password("abc", "secreto");
        let h3 = hash_password("otro", "secreto");
        assert_eq!(h1, h2);
        assert_ne!(h1, h3);
        assert_eq!(h1.len(), 64);
    }

    #[test]
    fn tokens_no_se_repiten() {
        let a = generar_token();
        let b = generar_token();
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
    }
}
