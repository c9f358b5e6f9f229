//! Static church data served as-is: ministries, media folders and contact info.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Ministry {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub leader: &'static str,
    pub contact: &'static str,
    pub schedule: &'static str,
    pub whatsapp_link: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct MediaLinks {
    pub pregacoes: &'static str,
    pub estudos: &'static str,
    pub videos: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChurchInfo {
    pub name: &'static str,
    pub address: &'static str,
    pub phone: &'static str,
    pub instagram: &'static str,
    pub maps_link: &'static str,
}

pub static MINISTRIES: [Ministry; 4] = [
    Ministry {
        id: "mcm",
        name: "MCM - Mulheres Cristãs em Missão",
        description: "Ministério dedicado às mulheres da igreja, promovendo crescimento espiritual e comunhão.",
        leader: "Irmã Maria",
        contact: "(99) 99999-9999",
        schedule: "Sextas-feiras às 19h30",
        whatsapp_link: "https://wa.me/5599999999999",
    },
    Ministry {
        id: "unijovem",
        name: "UNIJOVEM",
        description: "Ministério jovem focado no discipulado e evangelização da juventude.",
        leader: "Pastor João",
        contact: "(99) 99999-9998",
        schedule: "Sábados às 19h30",
        whatsapp_link: "https://wa.me/5599999999998",
    },
    Ministry {
        id: "umhbb",
        name: "UMHBB",
        description: "União Masculina Batista, fortalecendo os homens na fé e liderança cristã.",
        leader: "Irmão Pedro",
        contact: "(99) 99999-9997",
        schedule: "Sábados às 19h30",
        whatsapp_link: "https://wa.me/5599999999997",
    },
    Ministry {
        id: "mensageiras",
        name: "Mensageiras do Rei",
        description: "Ministério infantil dedicado ao ensino bíblico para crianças.",
        leader: "Irmã Ana",
        contact: "(99) 99999-9996",
        schedule: "Sábados às 15h30",
        whatsapp_link: "https://wa.me/5599999999996",
    },
];

// Drive folder ids are filled in once the media team shares them.
pub static MEDIA_LINKS: MediaLinks = MediaLinks {
    pregacoes: "https://drive.google.com/drive/folders/PREGACOES_FOLDER_ID",
    estudos: "https://drive.google.com/drive/folders/ESTUDOS_FOLDER_ID",
    videos: "https://drive.google.com/drive/folders/VIDEOS_FOLDER_ID",
};

pub static CHURCH_INFO: ChurchInfo = ChurchInfo {
    name: "Primeira Igreja Batista do Cordeiro",
    address: "R. Sete de Setembro, 451, São João dos Patos - MA, CEP 65665-000",
    phone: "(99) 99999-9999",
    instagram: "@pibdocordeiro",
    maps_link: "https://maps.google.com/?q=R.+Sete+de+Setembro,+451,+São+João+dos+Patos+-+MA",
};
